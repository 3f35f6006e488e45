use contactbook_core::db::open_db_in_memory;
use contactbook_core::{
    Contact, ContactDraft, ContactListQuery, ContactRepository, GroupRepository,
    GroupValidationError, RepoError, SqliteContactRepository, SqliteGroupRepository,
};

fn member_of(name: &str, group_id: i64, group_name: &str) -> Contact {
    let mut contact = ContactDraft::new(name).into_contact(0, None);
    contact.group_id = Some(group_id);
    contact.group_name = Some(group_name.to_string());
    contact
}

#[test]
fn create_trims_name_and_lists_sorted() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGroupRepository::try_new(&conn).unwrap();

    let work = repo.create_group("  work ").unwrap();
    assert_eq!(work.name, "work");
    repo.create_group("Family").unwrap();

    let names = repo
        .list_groups()
        .unwrap()
        .into_iter()
        .map(|group| group.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Family", "work"]);
    assert_eq!(repo.get_group(work.id).unwrap(), Some(work));
}

#[test]
fn blank_group_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGroupRepository::try_new(&conn).unwrap();

    let err = repo.create_group("   ").unwrap_err();
    assert!(matches!(
        err,
        RepoError::GroupValidation(GroupValidationError::BlankName)
    ));
}

#[test]
fn duplicate_names_are_rejected_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGroupRepository::try_new(&conn).unwrap();

    repo.create_group("Friends").unwrap();
    let err = repo.create_group("friends").unwrap_err();
    assert!(matches!(err, RepoError::DuplicateGroupName(name) if name == "friends"));

    let other = repo.create_group("Colleagues").unwrap();
    let err = repo.rename_group(other.id, "FRIENDS").unwrap_err();
    assert!(matches!(err, RepoError::DuplicateGroupName(_)));
}

#[test]
fn rename_refreshes_cached_name_on_members() {
    let conn = open_db_in_memory().unwrap();
    let groups = SqliteGroupRepository::try_new(&conn).unwrap();
    let contacts = SqliteContactRepository::try_new(&conn).unwrap();

    let group = groups.create_group("Work").unwrap();
    let first = contacts
        .create_contact(&member_of("Ann", group.id, "Work"))
        .unwrap();
    let second = contacts
        .create_contact(&member_of("Ben", group.id, "Work"))
        .unwrap();

    let renamed = groups.rename_group(group.id, "Office").unwrap();
    assert_eq!(renamed.name, "Office");

    for id in [first, second] {
        let contact = contacts.get_contact(id).unwrap().unwrap();
        assert_eq!(contact.group_id, Some(group.id));
        assert_eq!(contact.group_name.as_deref(), Some("Office"));
    }
}

#[test]
fn rename_missing_group_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGroupRepository::try_new(&conn).unwrap();

    let err = repo.rename_group(77, "Anything").unwrap_err();
    assert!(matches!(err, RepoError::GroupNotFound(77)));
}

#[test]
fn delete_cascades_to_member_contacts() {
    let conn = open_db_in_memory().unwrap();
    let groups = SqliteGroupRepository::try_new(&conn).unwrap();
    let contacts = SqliteContactRepository::try_new(&conn).unwrap();

    let group = groups.create_group("Club").unwrap();
    contacts
        .create_contact(&member_of("Cara", group.id, "Club"))
        .unwrap();
    contacts
        .create_contact(&member_of("Dan", group.id, "Club"))
        .unwrap();
    let outsider = contacts
        .create_contact(&ContactDraft::new("Eve").into_contact(0, None))
        .unwrap();

    let removed = groups.delete_group(group.id).unwrap();
    assert_eq!(removed, 2);
    assert_eq!(groups.get_group(group.id).unwrap(), None);

    let remaining = contacts.list_contacts(&ContactListQuery::default()).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, outsider);
}

#[test]
fn delete_missing_group_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGroupRepository::try_new(&conn).unwrap();

    let err = repo.delete_group(9).unwrap_err();
    assert!(matches!(err, RepoError::GroupNotFound(9)));
}
