//! Integration tests for the e-KYC core library

use std::io::{Cursor, Write};

use ekyc_core::archive::{self, ArchiveExtractor};
use ekyc_core::boundary::VerificationResponse;
use ekyc_core::{extract_identity, parse_identity_document, ErrorKind, ExtractorConfig, NOT_AVAILABLE};
use zip::unstable::write::FileOptionsExt;
use zip::write::SimpleFileOptions;
use zip::{AesMode, CompressionMethod, ZipWriter};

const SAMPLE_XML: &str = r#"<Root referenceId="R1"><UidData><Poi name="A" dob="01-01-1990" gender="M"/><Poa state="KA" country="IN"/><Pht>QUJD</Pht></UidData></Root>"#;

/// Build an in-memory ZIP, ZipCrypto-encrypting every entry when `share_code` is set
fn build_zip(
    entries: &[(&str, &str)],
    method: CompressionMethod,
    share_code: Option<&str>,
) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, content) in entries {
        let mut options = SimpleFileOptions::default().compression_method(method);
        if let Some(code) = share_code {
            options = options.with_deprecated_encryption(code.as_bytes());
        }
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

fn encrypted_zip(entries: &[(&str, &str)], share_code: &str) -> Vec<u8> {
    build_zip(entries, CompressionMethod::Deflated, Some(share_code))
}

fn aes_zip(name: &str, content: &str, share_code: &str) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .with_aes_encryption(AesMode::Aes256, share_code);

    zip.start_file(name, options).unwrap();
    zip.write_all(content.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

#[test]
fn test_sample_document_end_to_end() {
    env_logger::try_init().ok();

    let archive = encrypted_zip(&[("doc.xml", SAMPLE_XML)], "1234");
    let payload = archive::extract(&archive, "1234").unwrap();
    assert_eq!(payload.name, "doc.xml");
    assert_eq!(payload.content, SAMPLE_XML.as_bytes());

    let record = parse_identity_document(&payload.content).unwrap();
    assert_eq!(record.reference_id, "R1");
    assert_eq!(record.name, "A");
    assert_eq!(record.date_of_birth, "01-01-1990");
    assert_eq!(record.gender, "M");
    assert_eq!(record.address, "KA, IN");
    assert_eq!(record.photograph.as_deref(), Some("QUJD"));

    assert_eq!(extract_identity(&archive, "1234").unwrap(), record);
}

#[test]
fn test_wrong_share_code() {
    env_logger::try_init().ok();

    let archive = encrypted_zip(&[("doc.xml", SAMPLE_XML)], "1234");
    for code in ["0000", "1235", "4321", "9999", "12345", "abcd"] {
        let err = extract_identity(&archive, code).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCredential, "code {}", code);
    }
}

#[test]
fn test_every_wrong_code_is_rejected() {
    // About 1 in 256 wrong codes passes the ZipCrypto header check and only
    // fails once the decrypted stream is read
    for method in [CompressionMethod::Stored, CompressionMethod::Deflated] {
        let archive = build_zip(&[("doc.xml", SAMPLE_XML)], method, Some("1234"));
        let extractor = ArchiveExtractor::default();

        for n in 0..10_000u32 {
            let code = format!("{:04}", n);
            let result = extractor.extract(&archive, &code).map_err(|e| e.kind());
            if code == "1234" {
                assert_eq!(result.unwrap().content, SAMPLE_XML.as_bytes());
            } else {
                assert_eq!(
                    result.unwrap_err(),
                    ErrorKind::InvalidCredential,
                    "{:?} with code {}",
                    method,
                    code
                );
            }
        }
    }
}

#[test]
fn test_corrupt_unencrypted_entry() {
    let mut archive = build_zip(&[("doc.xml", SAMPLE_XML)], CompressionMethod::Stored, None);

    // Stored data sits verbatim after the local header
    let offset = archive
        .windows(SAMPLE_XML.len())
        .position(|window| window == SAMPLE_XML.as_bytes())
        .unwrap();
    archive[offset + 1] ^= 0x20;

    let err = ArchiveExtractor::default().extract(&archive, "1234").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedArchive);
    assert!(err.detail().unwrap().contains("doc.xml"));
}

#[test]
fn test_aes_encrypted_archive() {
    let archive = aes_zip("offline.xml", SAMPLE_XML, "5678");

    let record = extract_identity(&archive, "5678").unwrap();
    assert_eq!(record.reference_id, "R1");

    let err = extract_identity(&archive, "1234").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCredential);
}

#[test]
fn test_garbage_bytes_never_panic() {
    let mut inputs: Vec<Vec<u8>> = vec![
        Vec::new(),
        b"PK\x03\x04".to_vec(),
        b"PK\x05\x06".to_vec(),
        (0..=255u8).collect(),
        SAMPLE_XML.as_bytes().to_vec(),
    ];

    // Corrupt the central directory of a real archive
    let mut corrupted = encrypted_zip(&[("doc.xml", SAMPLE_XML)], "1234");
    let len = corrupted.len();
    for byte in &mut corrupted[len - 22..len - 4] {
        *byte = 0xAA;
    }
    inputs.push(corrupted);

    for input in inputs {
        for code in ["1234", "0000"] {
            let err = extract_identity(&input, code).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedArchive);
        }
    }
}

#[test]
fn test_archive_without_xml() {
    let archive = encrypted_zip(&[("readme.txt", "hello"), ("doc.XML.bak", "x")], "1234");
    for code in ["1234", "0000"] {
        let err = extract_identity(&archive, code).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoDocumentFound);
    }
}

#[test]
fn test_document_without_data_section() {
    let archive = encrypted_zip(&[("doc.xml", r#"<Root referenceId="R2"></Root>"#)], "1234");
    let err = extract_identity(&archive, "1234").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingDataSection);
}

#[test]
fn test_malformed_document_in_archive() {
    let archive = encrypted_zip(&[("doc.xml", "<Root><UidData>")], "1234");
    let err = extract_identity(&archive, "1234").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDocument);
}

#[test]
fn test_partial_document_degrades() {
    let xml = r#"<OfflinePaperlessKyc><UidData><Poi name="Ravi Kumar" dob="12-03-1978"/><Poa house="12" street="" state="  KA  "/></UidData></OfflinePaperlessKyc>"#;
    let archive = encrypted_zip(&[("offlineaadhaar20251123074351915.xml", xml)], "1111");

    let record = extract_identity(&archive, "1111").unwrap();
    assert_eq!(record.reference_id, NOT_AVAILABLE);
    assert_eq!(record.name, "Ravi Kumar");
    assert_eq!(record.gender, NOT_AVAILABLE);
    assert_eq!(record.address, "12, KA");
    assert!(record.photograph.is_none());
}

#[test]
fn test_inspect_and_limits() {
    let archive = encrypted_zip(&[("doc.xml", SAMPLE_XML)], "1234");

    let entries = archive::inspect(&archive).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "doc.xml");
    assert!(entries[0].encrypted);
    assert!(!entries[0].is_directory);

    let tight = ArchiveExtractor::new(ExtractorConfig::default().with_max_document_size(16));
    let err = tight.extract(&archive, "1234").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedArchive);
}

#[test]
fn test_concurrent_extraction() {
    let archive = std::sync::Arc::new(encrypted_zip(&[("doc.xml", SAMPLE_XML)], "1234"));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let archive = archive.clone();
            std::thread::spawn(move || {
                let code = if i % 2 == 0 { "1234" } else { "0000" };
                extract_identity(&archive, code).map_err(|e| e.kind())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.join().unwrap();
        if i % 2 == 0 {
            assert_eq!(result.unwrap().name, "A");
        } else {
            assert_eq!(result.unwrap_err(), ErrorKind::InvalidCredential);
        }
    }
}

#[test]
fn test_response_payload() {
    let archive = encrypted_zip(&[("doc.xml", SAMPLE_XML)], "1234");

    let ok = VerificationResponse::from_result(extract_identity(&archive, "1234"));
    assert_eq!(ok.status_code(), 200);
    let json = serde_json::to_value(&ok).unwrap();
    assert_eq!(json["name"], "A");
    assert_eq!(json["referenceId"], "R1");

    let failed = VerificationResponse::from_result(extract_identity(&archive, "0000"));
    assert_eq!(failed.status_code(), 400);
}
