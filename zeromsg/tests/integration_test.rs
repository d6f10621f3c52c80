use std::fs;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use zeromsg::archive::{self, Archive, ReplaceOutcome, DATA_FILE};
use zeromsg::elf;
use zeromsg::export::{self, ExportFormat};
use zeromsg::locale::{ContainerFile, Locale};
use zeromsg::message::{Message, MessageContainer, MessageTable};
use zeromsg::pipeline;

fn sample_container(locale: Locale) -> MessageContainer {
    let mut status = MessageTable::new(0);
    status
        .add_message(Message::from_text(
            0,
            "Hello brave new world",
            locale,
            b"\xFF".to_vec(),
        ))
        .unwrap();
    status
        .add_message(Message::from_text(
            1,
            "{Color#FF00FF}Warning\nlow battery",
            locale,
            b"\xFA\xFF".to_vec(),
        ))
        .unwrap();

    let mut chapter = MessageTable::new(0);
    chapter
        .add_message(Message::from_text(0, "The old house", locale, b"\xFF\xFF".to_vec()))
        .unwrap();
    let mut events = MessageTable::new(1);
    events.add_table(chapter).unwrap();

    let mut root = MessageTable::new(0);
    root.add_table(status).unwrap();
    root.add_table(events).unwrap();
    MessageContainer::from_root(root, Some(vec!["STATUS".into(), "EVENTS".into()]), locale)
}

#[test]
fn test_container_blob_roundtrip() {
    let container = sample_container(Locale::En);
    let blob = container.encode().unwrap();

    let reparsed = MessageContainer::parse(&blob, Locale::En).unwrap();
    assert!(container.content_eq(&reparsed));
    assert_eq!(reparsed.encode().unwrap(), blob);
}

#[test]
fn test_all_representations_agree() {
    let dir = tempdir().unwrap();
    let container = sample_container(Locale::En);

    let tree_dir = dir.path().join("tree");
    let json_path = dir.path().join("messages.json");
    let xml_path = dir.path().join("messages.xml");

    export::export_tree(&container, &tree_dir).unwrap();
    export::export_json(&container, &json_path).unwrap();
    export::export_xml(&container, &xml_path).unwrap();

    let from_tree = export::import_tree(&tree_dir, Locale::En).unwrap();
    let from_json = export::import_json(&json_path, Locale::En).unwrap();
    let from_xml = export::import_xml(&xml_path, Locale::En).unwrap();

    assert!(from_tree.content_eq(&from_json));
    assert!(from_json.content_eq(&from_xml));
    assert!(from_tree.content_eq(&container));
}

#[test]
fn test_archive_replace_in_place_and_rebuild() {
    let dir = tempdir().unwrap();
    let locale = Locale::En;
    let entry_name = ContainerFile::IgMsg.file_name(locale);
    let names = vec![entry_name.clone(), "DUMMY.BIN".to_string()];

    // pack an archive holding the container and a second entry
    let blob = sample_container(locale).encode().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join(&entry_name), &blob).unwrap();
    fs::write(src.join("DUMMY.BIN"), vec![0xDD; 3000]).unwrap();
    let packed = dir.path().join("packed");
    archive::pack_directory(&src, &names, &packed, Some(16)).unwrap();

    // export, edit the json text, and push it back in place
    let json_path = dir.path().join("edit.json");
    export::export_json(&sample_container(locale), &json_path).unwrap();
    let edited = fs::read_to_string(&json_path)
        .unwrap()
        .replace("Hello brave new world", "Hello again, brave new world");
    fs::write(&json_path, edited).unwrap();

    let outcome = pipeline::replace_in_archive(
        &json_path,
        &packed,
        &names,
        ContainerFile::IgMsg,
        locale,
        ExportFormat::Json,
    )
    .unwrap();
    assert_eq!(outcome, ReplaceOutcome::InPlace);

    // the new bytes sit in the old slot; the neighbor entry is untouched
    let expected = pipeline::import_representation(&json_path, locale, ExportFormat::Json)
        .unwrap()
        .encode()
        .unwrap();
    let archive_after = Archive::open(&packed, &names).unwrap();
    let dummy = archive_after.find("DUMMY.BIN").unwrap().clone();
    let data = fs::read(packed.join(DATA_FILE)).unwrap();
    assert_eq!(&data[..expected.len()], &expected[..]);
    assert_eq!(archive_after.read("DUMMY.BIN").unwrap(), vec![0xDD; 3000]);

    // growing past the slot forces a rebuild that keeps the capacity
    let mut big_table = MessageTable::new(0);
    big_table
        .add_message(Message::from_text(0, "A".repeat(40_000), locale, b"\xFF".to_vec()))
        .unwrap();
    let mut big_root = MessageTable::new(0);
    big_root.add_table(big_table).unwrap();
    let big = MessageContainer::from_root(big_root, None, locale);
    let big_json = dir.path().join("big.json");
    export::export_json(&big, &big_json).unwrap();

    let outcome = pipeline::replace_in_archive(
        &big_json,
        &packed,
        &names,
        ContainerFile::IgMsg,
        locale,
        ExportFormat::Json,
    )
    .unwrap();
    assert!(matches!(outcome, ReplaceOutcome::Rebuilt(_)));

    let rebuilt = Archive::open(&packed, &names).unwrap();
    let reread = rebuilt.read(&entry_name).unwrap();
    let reparsed = MessageContainer::parse(&reread, locale).unwrap();
    assert!(reparsed.content_eq(&big));
    assert_eq!(rebuilt.read("DUMMY.BIN").unwrap(), vec![0xDD; 3000]);
    assert!(rebuilt.find("DUMMY.BIN").unwrap().offset != dummy.offset);
}

#[test]
fn test_executable_names_drive_the_archive() {
    let dir = tempdir().unwrap();

    // a synthetic executable naming the two archive entries
    let mut exe = b"... padding ...".to_vec();
    exe.extend_from_slice(b"CD_FILE_DAT:T8=eIG_MSG_E_OBJ:0,SND_BD_BIN:1,;");
    let names = elf::toc_names(&exe).unwrap();
    assert_eq!(names, ["IG_MSG_E.OBJ", "SND_BD.BIN"]);

    let blob = sample_container(Locale::En).encode().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("IG_MSG_E.OBJ"), &blob).unwrap();
    fs::write(src.join("SND_BD.BIN"), vec![0x55; 100]).unwrap();
    let packed = dir.path().join("packed");
    archive::pack_directory(&src, &names, &packed, None).unwrap();

    let archive = Archive::open(&packed, &names).unwrap();
    let container =
        MessageContainer::parse(&archive.read("IG_MSG_E.OBJ").unwrap(), Locale::En).unwrap();
    assert_eq!(container.find_messages_containing("battery").len(), 1);
}
