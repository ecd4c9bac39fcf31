
use std::fs;
use std::io::Read;

use flate2::read::GzDecoder;
use pbzstream::protobuf::ProtobufCodec;
use pbzstream::{PbzReader, PbzWriter, WriteError};
use pbzstream_core::{FrameTag, read_frame};
use prost_reflect::ReflectMessage as _;
use test_helpers::*;

#[test]
fn roundtrip_preserves_messages_and_order() {
    let blob = test_descriptor_set();
    let codec = test_codec();

    let mut writer = PbzWriter::from_writer(Vec::new(), &blob, codec.clone()).unwrap();
    writer.write(&header(&codec, 1)).unwrap();
    for id in 0..10 {
        writer.write(&object(&codec, id)).unwrap();
    }
    let bytes = writer.finish().unwrap();

    // The reader starts with an empty codec: every type it decodes comes
    // from the descriptor set embedded in the stream.
    let mut reader = PbzReader::from_reader(bytes.as_slice(), ProtobufCodec::new()).unwrap();

    let first = reader.read().unwrap().unwrap();
    assert_eq!(first.descriptor().full_name(), "test.Header");
    assert_eq!(i32_field(&first, "version"), 1);

    for id in 0..10 {
        let msg = reader.read().unwrap().unwrap();
        assert_eq!(msg.descriptor().full_name(), "test.Object");
        assert_eq!(i32_field(&msg, "id"), id);
    }

    assert!(reader.read().unwrap().is_none());
    // Done is sticky.
    assert!(reader.read().unwrap().is_none());
}

#[test]
fn descriptor_name_emitted_once_per_type_run() {
    let blob = test_descriptor_set();
    let codec = test_codec();

    let mut writer = PbzWriter::from_writer(Vec::new(), &blob, codec.clone()).unwrap();
    writer.write(&header(&codec, 1)).unwrap();
    for id in 0..10 {
        writer.write(&object(&codec, id)).unwrap();
    }
    let bytes = writer.finish().unwrap();

    let mut decompressed = Vec::new();
    GzDecoder::new(bytes.as_slice())
        .read_to_end(&mut decompressed)
        .unwrap();
    assert_eq!(&decompressed[..2], b"AB");

    let mut source = &decompressed[2..];
    let mut tags = Vec::new();
    let mut names = Vec::new();
    while let Some(frame) = read_frame(&mut source).unwrap() {
        if frame.tag == FrameTag::DescriptorName.as_u8() {
            names.push(String::from_utf8(frame.payload.clone()).unwrap());
        }
        tags.push(frame.tag);
    }

    // One FileDescriptor frame, then one DescriptorName per type run.
    let mut expected = vec![1u8, 2, 3, 2];
    expected.extend(std::iter::repeat_n(3u8, 10));
    assert_eq!(tags, expected);
    assert_eq!(names, vec!["test.Header", "test.Object"]);
}

#[test]
fn alternating_types_emit_descriptor_name_each_switch() {
    let blob = test_descriptor_set();
    let codec = test_codec();

    let mut writer = PbzWriter::from_writer(Vec::new(), &blob, codec.clone()).unwrap();
    writer.write(&header(&codec, 1)).unwrap();
    writer.write(&object(&codec, 1)).unwrap();
    writer.write(&header(&codec, 2)).unwrap();
    let bytes = writer.finish().unwrap();

    let mut decompressed = Vec::new();
    GzDecoder::new(bytes.as_slice())
        .read_to_end(&mut decompressed)
        .unwrap();

    let mut source = &decompressed[2..];
    let mut tags = Vec::new();
    while let Some(frame) = read_frame(&mut source).unwrap() {
        tags.push(frame.tag);
    }
    assert_eq!(tags, vec![1, 2, 3, 2, 3, 2, 3]);
}

#[test]
fn empty_stream_yields_no_messages() {
    let blob = test_descriptor_set();
    let writer = PbzWriter::from_writer(Vec::new(), &blob, ProtobufCodec::new()).unwrap();
    let bytes = writer.finish().unwrap();

    let mut reader = PbzReader::from_reader(bytes.as_slice(), ProtobufCodec::new()).unwrap();
    assert!(reader.read().unwrap().is_none());
}

#[test]
fn iterator_yields_all_messages() {
    let blob = test_descriptor_set();
    let codec = test_codec();

    let mut writer = PbzWriter::from_writer(Vec::new(), &blob, codec.clone()).unwrap();
    for id in 0..5 {
        writer.write(&object(&codec, id)).unwrap();
    }
    let bytes = writer.finish().unwrap();

    let reader = PbzReader::from_reader(bytes.as_slice(), ProtobufCodec::new()).unwrap();
    let ids: Vec<i32> = reader
        .map(|msg| i32_field(&msg.unwrap(), "id"))
        .collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
}

#[test]
fn create_and_open_via_paths() {
    let dir = tempfile::tempdir().unwrap();
    let descriptor_path = dir.path().join("messages.descr");
    fs::write(&descriptor_path, test_descriptor_set()).unwrap();
    let stream_path = dir.path().join("out.pbz");

    let mut writer =
        PbzWriter::create(&stream_path, &descriptor_path, ProtobufCodec::new()).unwrap();
    let codec = test_codec();
    writer.write(&header(&codec, 7)).unwrap();
    writer.flush().unwrap();
    writer.write(&object(&codec, 3)).unwrap();
    writer.close().unwrap();

    let mut reader = PbzReader::open(&stream_path, ProtobufCodec::new()).unwrap();
    let first = reader.read().unwrap().unwrap();
    assert_eq!(i32_field(&first, "version"), 7);
    let second = reader.read().unwrap().unwrap();
    assert_eq!(i32_field(&second, "id"), 3);
    assert!(reader.read().unwrap().is_none());
    reader.close();
}

#[test]
fn create_with_missing_descriptor_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = PbzWriter::create(
        dir.path().join("out.pbz"),
        dir.path().join("missing.descr"),
        ProtobufCodec::new(),
    )
    .unwrap_err();
    assert!(matches!(err, WriteError::SchemaRead { .. }));
}

#[test]
fn create_in_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let descriptor_path = dir.path().join("messages.descr");
    fs::write(&descriptor_path, test_descriptor_set()).unwrap();

    let err = PbzWriter::create(
        dir.path().join("no-such-dir").join("out.pbz"),
        &descriptor_path,
        ProtobufCodec::new(),
    )
    .unwrap_err();
    assert!(matches!(err, WriteError::Create { .. }));
}
