use aac_core::speech::{SpeechEngine, Utterance};
use aac_core::{AacEngine, AacError, Board, ComposerKind, Config, GrammarType, Language, Pictogram, DEFAULT_BOARD_ID};
use std::cell::RefCell;
use std::rc::Rc;
use tempfile::TempDir;

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<Utterance>>>);

impl SpeechEngine for Recorder {
    fn speak(&mut self, utterance: &Utterance) {
        self.0.borrow_mut().push(utterance.clone());
    }
}

fn open(dir: &TempDir, composer: ComposerKind) -> (AacEngine, Recorder) {
    let recorder = Recorder::default();
    let config = Config::new(dir.path()).with_composer(composer);
    (AacEngine::open(&config, Box::new(recorder.clone())), recorder)
}

#[test]
fn first_start_creates_and_activates_default_board() {
    let dir = TempDir::new().unwrap();
    let (engine, _) = open(&dir, ComposerKind::Mock);

    assert_eq!(engine.boards.active_board_id(), DEFAULT_BOARD_ID);
    let boards = engine.boards.list_boards();
    assert_eq!(boards.len(), 1);
    let all: Vec<String> = engine.catalog().all_pictograms().iter().map(|p| p.id.clone()).collect();
    assert_eq!(boards[0].pictogram_ids, all);
    assert_eq!(engine.grid().len(), all.len());
}

#[test]
fn tap_auto_speaks_and_speak_uses_mock_table() {
    let dir = TempDir::new().unwrap();
    let (mut engine, spoken) = open(&dir, ComposerKind::Mock);

    assert!(engine.tap("yo"));
    assert!(engine.tap("querer"));
    assert!(engine.tap("galleta"));
    assert!(!engine.tap("unicornio"));
    assert_eq!(engine.phrase.len(), 3);
    assert_eq!(spoken.0.borrow().len(), 3);
    assert_eq!(spoken.0.borrow()[1].text, "querer");

    assert_eq!(engine.speak_phrase().unwrap(), "Yo quiero una galleta");
    assert_eq!(spoken.0.borrow().last().unwrap().text, "Yo quiero una galleta");
}

#[test]
fn auto_speak_off_stays_quiet() {
    let dir = TempDir::new().unwrap();
    let (mut engine, spoken) = open(&dir, ComposerKind::RuleBased);
    engine.settings.set_auto_speak(false).unwrap();
    engine.settings.set_language(Language::Catalan).unwrap();

    engine.tap("nena");
    engine.tap("menjar");
    engine.tap("poma");
    assert!(spoken.0.borrow().is_empty());
    assert_eq!(engine.speak_phrase().unwrap(), "nena menjar poma");

    engine.remove_at(9);
    engine.remove_at(0);
    assert_eq!(engine.compose_phrase().unwrap(), "menjar poma");
    engine.clear_phrase();
    assert_eq!(engine.compose_phrase().unwrap(), "");
}

#[test]
fn llm_composer_reports_not_implemented() {
    let dir = TempDir::new().unwrap();
    let (mut engine, spoken) = open(&dir, ComposerKind::Llm);
    engine.settings.set_auto_speak(false).unwrap();
    engine.tap("yo");
    assert!(matches!(engine.speak_phrase(), Err(AacError::NotImplemented(_))));
    assert!(spoken.0.borrow().is_empty());
}

#[test]
fn boards_switch_and_survive_deletion() {
    let dir = TempDir::new().unwrap();
    let (mut engine, _) = open(&dir, ComposerKind::Mock);

    let food = engine
        .save_board(Board::new("Menjar", vec!["galleta".into(), "poma".into(), "ghost".into()]))
        .unwrap();
    engine.switch_board(&food.id).unwrap();
    let ids: Vec<_> = engine.grid().iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, vec!["galleta", "poma"]);

    assert!(matches!(engine.switch_board("board_nope"), Err(AacError::UnknownBoard(_))));
    assert!(matches!(engine.delete_board(DEFAULT_BOARD_ID), Err(AacError::DefaultBoardProtected)));

    engine.delete_board(&food.id).unwrap();
    assert_eq!(engine.boards.active_board_id(), DEFAULT_BOARD_ID);
}

#[test]
fn catalog_edits_persist_and_resolve() {
    let dir = TempDir::new().unwrap();
    let (mut engine, _) = open(&dir, ComposerKind::Mock);

    let image = engine.images.save_image(&b"png"[..]).unwrap();
    let mut gos = Pictogram::new(Pictogram::new_custom_id(), GrammarType::Noun)
        .with_label(Language::Catalan, "gos")
        .with_label(Language::Spanish, "perro");
    gos.custom_image_path = Some(image.clone());
    let id = gos.id.clone();
    engine.upsert_pictogram("animals", gos);

    let reopened = AacEngine::open(&Config::new(dir.path()), Box::new(Recorder::default()));
    assert_eq!(reopened.catalog().find_by_id(&id).unwrap().label(Language::English), "perro");
    drop(reopened);

    // Deleting the pictogram drops it from boards and removes its image.
    let board = engine.save_board(Board::new("Animals", vec![id.clone()])).unwrap();
    engine.switch_board(&board.id).unwrap();
    assert_eq!(engine.grid().len(), 1);
    assert!(engine.remove_pictogram(&id).is_some());
    assert!(engine.grid().is_empty());
    assert!(!engine.images.image_exists(&image));

    engine.reset_catalog();
    assert!(engine.catalog().find_with_category("galleta").is_some());
}

#[test]
fn settings_survive_restart() {
    let dir = TempDir::new().unwrap();
    {
        let (mut engine, _) = open(&dir, ComposerKind::Mock);
        engine.settings.set_grid_columns(6).unwrap();
        engine.settings.set_volume_boost(true).unwrap();
    }
    let (mut engine, spoken) = open(&dir, ComposerKind::Mock);
    assert_eq!(engine.settings.settings().grid_columns, 6);
    engine.tap("hola");
    assert_eq!(spoken.0.borrow()[0].volume_hint(), Some(0.9));
}

#[test]
fn resaved_board_moves_to_front() {
    let dir = TempDir::new().unwrap();
    let (mut engine, _) = open(&dir, ComposerKind::Mock);

    let mut older = Board::new("Older", vec!["yo".into()]);
    older.last_modified = 1;
    let mut newer = Board::new("Newer", vec!["tu".into()]);
    newer.last_modified = 2;
    engine.boards.save_board(&older).unwrap();
    engine.boards.save_board(&newer).unwrap();
    let ids: Vec<String> = engine.boards.list_boards().into_iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![DEFAULT_BOARD_ID.to_string(), newer.id.clone(), older.id.clone()]);

    let older = engine.save_board(older).unwrap();
    assert!(older.last_modified > 2);
    let ids: Vec<String> = engine.boards.list_boards().into_iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![older.id.clone(), DEFAULT_BOARD_ID.to_string(), newer.id.clone()]);

    // Deleting the active board hands over to the most recent survivor.
    engine.switch_board(&newer.id).unwrap();
    engine.delete_board(&newer.id).unwrap();
    assert_eq!(engine.boards.active_board_id(), older.id);
}
