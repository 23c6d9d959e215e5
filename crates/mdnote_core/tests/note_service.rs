use mdnote_core::{
    BufferEvent, EditAction, EditIntent, EditorSettings, GraphError, JsonFileStore, NoteService,
    Position, ServiceError, SqliteNoteStore,
};

fn json_service(dir: &tempfile::TempDir) -> NoteService<JsonFileStore> {
    NoteService::new(
        JsonFileStore::new(dir.path().join("notes.json")),
        EditorSettings::default(),
    )
}

#[test]
fn first_run_seeds_welcome_note_and_saves_it() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = json_service(&dir);

    assert_eq!(service.load().unwrap(), 1);
    service.save().unwrap();

    let mut reloaded = json_service(&dir);
    assert_eq!(reloaded.load().unwrap(), 1);
    assert_eq!(
        reloaded.graph().snapshot(),
        service.graph().snapshot()
    );
}

#[test]
fn malformed_document_keeps_current_notes() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = json_service(&dir);
    service.create_note("Keep me").unwrap();

    std::fs::write(dir.path().join("notes.json"), "{\"notes\": [").unwrap();
    let err = service.load().unwrap_err();

    assert!(matches!(err, ServiceError::Store(_)));
    assert_eq!(service.graph().len(), 1);
    assert!(service.graph().find_by_title("Keep me").is_some());
}

#[test]
fn new_note_content_starts_with_heading() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = json_service(&dir);
    let id = service.create_note("Plans").unwrap();
    assert_eq!(service.graph().get(&id).unwrap().content(), "# Plans\n\n");
}

#[test]
fn editor_session_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = json_service(&dir);
    let target = service.create_note("Guide").unwrap();
    let source = service.create_note("Intro").unwrap();

    let mut session = service.open_editor(&source).unwrap();
    assert_eq!(session.note_id(), source);
    let events = session.buffer.subscribe();

    let end = session.buffer.line_end(2);
    session.buffer.insert_text(end, "- see [[Guide]]");
    let outcome = service
        .apply_edit(
            &mut session,
            &EditIntent::new(EditAction::Enter, Position::new(2, 15)),
        )
        .unwrap();
    assert!(outcome.changed);
    assert_eq!(session.cursor, Position::new(3, 2));
    assert_eq!(
        events.try_iter().collect::<Vec<_>>(),
        vec![BufferEvent::Edited, BufferEvent::Edited]
    );

    assert!(service.graph().backlinks_of(&target).is_empty());
    service.commit_editor(&session).unwrap();
    assert_eq!(service.graph().backlinks_of(&target), vec![source.clone()]);
    assert_eq!(
        service.graph().get(&source).unwrap().content(),
        "# Intro\n\n- see [[Guide]]\n- "
    );
}

#[test]
fn highlight_reports_spans_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = json_service(&dir);
    let id = service.create_note("Styled").unwrap();
    let session = service.open_editor(&id).unwrap();

    let lines = service.highlight(&session);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].len(), 1);
    assert!(lines[1].is_empty());
}

#[test]
fn commit_after_delete_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = json_service(&dir);
    let id = service.create_note("Temp").unwrap();
    let session = service.open_editor(&id).unwrap();
    service.graph_mut().delete(&id).unwrap();

    let err = service.commit_editor(&session).unwrap_err();
    assert!(matches!(err, ServiceError::Graph(GraphError::NotFound(_))));
    assert!(service.open_editor(&id).is_none());
}

#[test]
fn sqlite_backed_service_persists_notes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    let mut service = NoteService::new(
        SqliteNoteStore::open(&path).unwrap(),
        EditorSettings::default(),
    );
    service.create_note("Stored").unwrap();
    service.save().unwrap();
    drop(service);

    let mut reopened = NoteService::new(
        SqliteNoteStore::open(&path).unwrap(),
        EditorSettings::default(),
    );
    assert_eq!(reopened.load().unwrap(), 1);
    assert!(reopened.graph().find_by_title("Stored").is_some());
}
