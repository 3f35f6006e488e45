use contactbook_core::{
    build_sections, find_section_start, section_key, section_labels, sort_for_sections, Contact,
    ContactDraft, PinyinRomanizer, SectionEntry, SectionedList, FALLBACK_SECTION,
};

fn named(id: i64, name: &str) -> Contact {
    ContactDraft::new(name).into_contact(id, None)
}

fn no_readings(_: char) -> Vec<String> {
    Vec::new()
}

#[test]
fn latin_names_use_their_uppercased_initial() {
    assert_eq!(section_key("Zoe", &PinyinRomanizer), "Z");
    assert_eq!(section_key("zoe", &PinyinRomanizer), "Z");
    assert_eq!(section_key("amy", &PinyinRomanizer), "A");
}

#[test]
fn han_names_use_the_pinyin_initial() {
    assert_eq!(section_key("李", &PinyinRomanizer), "L");
    assert_eq!(section_key("李雷", &PinyinRomanizer), "L");
    assert_eq!(section_key("王芳", &PinyinRomanizer), "W");
}

#[test]
fn everything_else_falls_into_the_fallback_section() {
    assert_eq!(section_key("", &PinyinRomanizer), FALLBACK_SECTION);
    assert_eq!(section_key("123", &PinyinRomanizer), "#");
    assert_eq!(section_key("āàá", &PinyinRomanizer), "#");
    assert_eq!(section_key(" Amy", &PinyinRomanizer), "#");
}

#[test]
fn han_without_a_reading_falls_back() {
    assert_eq!(section_key("李", &no_readings), "#");

    let odd_reading = |_: char| vec!["1st".to_string()];
    assert_eq!(section_key("李", &odd_reading), "#");

    let first_wins = |_: char| vec!["zhang".to_string(), "chang".to_string()];
    assert_eq!(section_key("长", &first_wins), "Z");
}

#[test]
fn sorted_snapshot_groups_mixed_scripts() {
    let mut contacts = vec![
        named(1, "Zoe"),
        named(2, "李雷"),
        named(3, ""),
        named(4, "Amy"),
        named(5, "lucy"),
        named(6, "42"),
    ];
    sort_for_sections(&mut contacts, &PinyinRomanizer);
    let entries = build_sections(&contacts, &PinyinRomanizer);

    assert_eq!(section_labels(&entries), ["A", "L", "Z", "#"]);

    let headers = entries.iter().filter(|entry| entry.is_header()).count();
    assert_eq!(headers, 4);
    assert_eq!(entries.len(), contacts.len() + headers);

    // every item sits directly under the header of its own key
    let mut current = None;
    for entry in &entries {
        match entry {
            SectionEntry::Header { label } => current = Some(label.clone()),
            SectionEntry::Item { contact } => {
                assert_eq!(
                    current.as_deref(),
                    Some(section_key(&contact.name, &PinyinRomanizer).as_str())
                );
            }
        }
    }
}

#[test]
fn sections_are_ordered_and_stable_within_a_key() {
    let mut contacts = vec![named(3, "Bob"), named(1, "bob"), named(2, "Ann")];
    sort_for_sections(&mut contacts, &PinyinRomanizer);
    let ids = contacts.iter().map(|contact| contact.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![2, 1, 3]);
}

#[test]
fn jump_to_letter_finds_header_positions() {
    let mut contacts = vec![named(1, "Amy"), named(2, "李"), named(3, "Zoe")];
    sort_for_sections(&mut contacts, &PinyinRomanizer);
    let entries = build_sections(&contacts, &PinyinRomanizer);

    assert_eq!(find_section_start(&entries, 'A'), Some(0));
    assert_eq!(find_section_start(&entries, 'L'), Some(2));
    assert_eq!(find_section_start(&entries, 'z'), Some(4));
    assert_eq!(find_section_start(&entries, 'Q'), None);
    assert_eq!(find_section_start(&entries, '#'), None);
}

#[test]
fn jump_to_fallback_finds_the_hash_section() {
    let mut contacts = vec![named(1, "42 Club"), named(2, "Amy"), named(3, "")];
    sort_for_sections(&mut contacts, &PinyinRomanizer);
    let entries = build_sections(&contacts, &PinyinRomanizer);

    let start = find_section_start(&entries, '#').unwrap();
    assert_eq!(start, 2);
    assert_eq!(entries[start], SectionEntry::header(FALLBACK_SECTION));
    assert_eq!(entries.len(), 5);
}

#[test]
fn sectioned_list_tracks_positions_across_snapshots() {
    let mut list = SectionedList::new();
    assert!(list.is_empty());

    list.apply_snapshot(&[named(1, "Amy"), named(2, "Zoe")]);
    assert_eq!(list.len(), 4);
    assert_eq!(list.position_for_section('Z'), Some(2));

    list.apply_snapshot(&[named(1, "Amy"), named(3, "Max"), named(2, "Zoe")]);
    assert_eq!(list.position_for_section('Z'), Some(4));
    assert_eq!(list.labels(), ["A", "M", "Z"]);
}
