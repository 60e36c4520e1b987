// C boundary for the mobile shell. The engine lives behind an opaque handle
// owned by the host; every entry point catches panics.
use crate::config::Config;
use crate::core::settings::AppSettings;
use crate::speech::{SilentSpeech, SpeechEngine, Utterance};
use crate::AacEngine;
use libc::{c_char, c_float, c_int};
use std::ffi::{CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;
use tracing::error;

/// Host callback: text, BCP-47 locale, rate, pitch, volume boost (0/1).
pub type SpeakCallback = extern "C" fn(*const c_char, *const c_char, c_float, c_float, c_int);

struct CallbackSpeech {
    callback: SpeakCallback,
}

impl SpeechEngine for CallbackSpeech {
    fn speak(&mut self, utterance: &Utterance) {
        let (Ok(text), Ok(locale)) = (
            CString::new(utterance.text.as_str()),
            CString::new(utterance.language.locale_tag()),
        ) else {
            return;
        };
        (self.callback)(
            text.as_ptr(),
            locale.as_ptr(),
            utterance.rate,
            utterance.pitch,
            c_int::from(utterance.volume_boost),
        );
    }
}

unsafe fn str_arg<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    CStr::from_ptr(s).to_str().ok()
}

unsafe fn engine_mut<'a>(handle: *mut AacEngine) -> Option<&'a mut AacEngine> {
    handle.as_mut()
}

fn into_c_string(s: String) -> *mut c_char {
    CString::new(s)
        .map(CString::into_raw)
        .unwrap_or(ptr::null_mut())
}

fn guarded<T>(name: &str, fallback: T, f: impl FnOnce() -> T) -> T {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        error!(call = name, "panic across the C boundary");
        fallback
    })
}

/// Opens an engine on `data_dir`. `speak` may be null to disable speech.
/// Returns null on failure.
#[no_mangle]
pub extern "C" fn aac_engine_open(data_dir: *const c_char, speak: Option<SpeakCallback>) -> *mut AacEngine {
    guarded("aac_engine_open", ptr::null_mut(), || {
        let Some(dir) = (unsafe { str_arg(data_dir) }) else {
            return ptr::null_mut();
        };
        let speech: Box<dyn SpeechEngine> = match speak {
            Some(callback) => Box::new(CallbackSpeech { callback }),
            None => Box::new(SilentSpeech),
        };
        let engine = AacEngine::open(&Config::new(dir), speech);
        Box::into_raw(Box::new(engine))
    })
}

#[no_mangle]
pub extern "C" fn aac_engine_close(handle: *mut AacEngine) {
    if handle.is_null() {
        return;
    }
    guarded("aac_engine_close", (), || unsafe {
        drop(Box::from_raw(handle));
    })
}

/// 1 if the pictogram was appended, 0 otherwise.
#[no_mangle]
pub extern "C" fn aac_tap(handle: *mut AacEngine, pictogram_id: *const c_char) -> c_int {
    guarded("aac_tap", 0, || unsafe {
        match (engine_mut(handle), str_arg(pictogram_id)) {
            (Some(engine), Some(id)) => c_int::from(engine.tap(id)),
            _ => 0,
        }
    })
}

#[no_mangle]
pub extern "C" fn aac_remove_at(handle: *mut AacEngine, index: usize) {
    guarded("aac_remove_at", (), || unsafe {
        if let Some(engine) = engine_mut(handle) {
            engine.remove_at(index);
        }
    })
}

#[no_mangle]
pub extern "C" fn aac_clear(handle: *mut AacEngine) {
    guarded("aac_clear", (), || unsafe {
        if let Some(engine) = engine_mut(handle) {
            engine.clear_phrase();
        }
    })
}

/// JSON array of the active board's pictograms.
#[no_mangle]
pub extern "C" fn aac_grid_json(handle: *mut AacEngine) -> *mut c_char {
    guarded("aac_grid_json", ptr::null_mut(), || unsafe {
        let json = engine_mut(handle)
            .and_then(|engine| serde_json::to_string(&engine.grid()).ok())
            .unwrap_or_else(|| "[]".to_string());
        into_c_string(json)
    })
}

/// JSON array of the phrase being composed.
#[no_mangle]
pub extern "C" fn aac_phrase_json(handle: *mut AacEngine) -> *mut c_char {
    guarded("aac_phrase_json", ptr::null_mut(), || unsafe {
        let json = engine_mut(handle)
            .and_then(|engine| serde_json::to_string(engine.phrase.pictograms()).ok())
            .unwrap_or_else(|| "[]".to_string());
        into_c_string(json)
    })
}

/// Composes and speaks the phrase. Returns the sentence, or null when the
/// configured composer fails.
#[no_mangle]
pub extern "C" fn aac_speak_phrase(handle: *mut AacEngine) -> *mut c_char {
    guarded("aac_speak_phrase", ptr::null_mut(), || unsafe {
        match engine_mut(handle).map(|engine| engine.speak_phrase()) {
            Some(Ok(sentence)) => into_c_string(sentence),
            Some(Err(e)) => {
                error!(error = %e, "phrase not composed");
                ptr::null_mut()
            }
            None => ptr::null_mut(),
        }
    })
}

#[no_mangle]
pub extern "C" fn aac_settings_json(handle: *mut AacEngine) -> *mut c_char {
    guarded("aac_settings_json", ptr::null_mut(), || unsafe {
        let json = engine_mut(handle)
            .and_then(|engine| serde_json::to_string(engine.settings.settings()).ok())
            .unwrap_or_else(|| "{}".to_string());
        into_c_string(json)
    })
}

/// Replaces the settings with a JSON record; missing keys take defaults.
/// 1 on success, 0 if the JSON is invalid. A failed write still counts
/// as success.
#[no_mangle]
pub extern "C" fn aac_update_settings_json(handle: *mut AacEngine, json: *const c_char) -> c_int {
    guarded("aac_update_settings_json", 0, || unsafe {
        let (Some(engine), Some(json)) = (engine_mut(handle), str_arg(json)) else {
            return 0;
        };
        match serde_json::from_str::<AppSettings>(json) {
            Ok(settings) => {
                if let Err(e) = engine.settings.update(settings) {
                    error!(error = %e, "settings not saved");
                }
                1
            }
            Err(_) => 0,
        }
    })
}

#[no_mangle]
pub extern "C" fn aac_switch_board(handle: *mut AacEngine, board_id: *const c_char) -> c_int {
    guarded("aac_switch_board", 0, || unsafe {
        match (engine_mut(handle), str_arg(board_id)) {
            (Some(engine), Some(id)) => c_int::from(engine.switch_board(id).is_ok()),
            _ => 0,
        }
    })
}

#[no_mangle]
pub extern "C" fn aac_free_string(s: *mut c_char) {
    if !s.is_null() {
        unsafe {
            let _ = CString::from_raw(s);
        }
    }
}
