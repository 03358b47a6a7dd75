use contacts_core::{
    AppConfig, ContactsApp, DetailView, FormField, ListScreen, Route, Screen, SqliteContactStore,
};
use tokio::runtime::Handle;

fn app() -> ContactsApp<SqliteContactStore> {
    ContactsApp::open_in_memory(Handle::current()).unwrap()
}

fn fill(screen: &mut ListScreen<SqliteContactStore>, values: [&str; 4]) {
    for (field, value) in FormField::ALL.into_iter().zip(values) {
        screen.set_field(field, value);
    }
}

#[tokio::test]
async fn submitting_the_form_inserts_and_resets_buffers() {
    let app = app();
    let mut list = app.list_screen();

    fill(&mut list, ["Bob", "Jones", "555-0002", "bob@x.com"]);
    let draft = list.submit();
    assert!(list.form().is_empty());

    assert_eq!(list.settle().await, 0);
    assert!(list.needs_render());
    let rows = list.rows();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].contact.matches_draft(&draft));
    assert_eq!(rows[0].title, "Bob Jones");
    assert_eq!(rows[0].subtitle, "555-0002");
    assert!(!list.needs_render());
}

#[tokio::test]
async fn empty_form_submission_is_accepted() {
    let app = app();
    let mut list = app.list_screen();

    list.submit();
    assert_eq!(list.settle().await, 0);

    let rows = list.rows();
    assert_eq!(rows.len(), 1);
    let contact = &rows[0].contact;
    assert_eq!(contact.first_name, "");
    assert_eq!(contact.last_name, "");
    assert_eq!(contact.phone_number, "");
    assert_eq!(contact.email.as_deref(), Some(""));
}

#[tokio::test]
async fn rows_are_sorted_and_delete_affordance_removes_the_row() {
    let app = app();
    let mut list = app.list_screen();

    fill(&mut list, ["Bob", "Jones", "555-0002", "bob@x.com"]);
    list.submit();
    fill(&mut list, ["Alice", "Smith", "555-0001", ""]);
    list.submit();
    list.settle().await;

    let titles: Vec<String> = list.rows().into_iter().map(|row| row.title).collect();
    assert_eq!(titles, vec!["Alice Smith", "Bob Jones"]);

    let alice = list.rows().remove(0).contact;
    list.delete_row(&alice);
    list.settle().await;

    let titles: Vec<String> = list.rows().into_iter().map(|row| row.title).collect();
    assert_eq!(titles, vec!["Bob Jones"]);
}

#[tokio::test]
async fn detail_round_trip_returns_to_the_live_list() {
    let mut app = app();
    let mut list = app.list_screen();
    fill(&mut list, ["Alice", "Smith", "555-0001", ""]);
    list.submit();
    list.settle().await;

    let alice = list.rows().remove(0).contact;
    let route = app.navigator_mut().navigate(list.open_row(&alice));
    assert_eq!(route, Route::detail(alice.id));

    let mut detail = match app.current_screen() {
        Screen::Detail(detail) => detail,
        Screen::List(_) => panic!("expected detail screen"),
    };
    match detail.view() {
        DetailView::Loaded { contact, card } => {
            assert_eq!(contact, alice);
            assert_eq!(card.name_line, "Name: Alice Smith");
            assert_eq!(card.phone_line, "Phone Number: 555-0001");
        }
        DetailView::Missing { .. } => panic!("alice should be loaded"),
    }

    // The list changes while the detail screen is shown.
    fill(&mut list, ["Carol", "White", "555-0003", ""]);
    list.submit();
    list.settle().await;
    drop(list);

    let back = detail.back();
    assert_eq!(app.navigator_mut().navigate(back), Route::List);
    let mut list = match app.current_screen() {
        Screen::List(list) => list,
        Screen::Detail(_) => panic!("expected list screen"),
    };
    let titles: Vec<String> = list.rows().into_iter().map(|row| row.title).collect();
    assert_eq!(titles, vec!["Alice Smith", "Carol White"]);
}

#[tokio::test]
async fn detail_screen_deletes_its_contact_and_then_reports_missing() {
    let mut app = app();
    let mut list = app.list_screen();
    fill(&mut list, ["Dan", "Brown", "555-0004", "dan@x.com"]);
    list.submit();
    list.settle().await;
    let dan = list.rows().remove(0).contact;

    app.navigator_mut().navigate(Route::detail(dan.id));
    let mut detail = app.detail_screen(dan.id);
    let next = detail.delete();
    assert_eq!(detail.settle().await, 0);
    assert_eq!(app.navigator_mut().navigate(next), Route::List);

    assert!(detail.needs_render());
    assert_eq!(detail.view(), DetailView::Missing { contact_id: dan.id });
    assert!(list.rows().is_empty());
}

#[tokio::test]
async fn detail_of_unknown_contact_is_missing() {
    let app = app();
    let mut detail = app.detail_screen(404);

    assert_eq!(detail.view(), DetailView::Missing { contact_id: 404 });
    assert_eq!(detail.delete(), Route::List);
    assert_eq!(detail.view_model_mut().in_flight(), 0);
}

#[tokio::test]
async fn file_backed_app_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::from_lookup(|_| None).with_db_path(dir.path().join("nested/contacts.db"));

    {
        let app = ContactsApp::open(&config, Handle::current()).unwrap();
        let mut list = app.list_screen();
        fill(&mut list, ["Eve", "Stone", "555-0005", ""]);
        list.submit();
        list.settle().await;
    }

    let app = ContactsApp::open(&config, Handle::current()).unwrap();
    let contacts = app.repository().list_contacts().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].display_name(), "Eve Stone");
}
