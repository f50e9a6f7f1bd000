//! Integration tests for the IMAP session.
//!
//! A scripted mock stream plays the server; every command the session
//! writes must match the script byte for byte.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use tokio_test::io::Builder;

use mailsort_imap::{Error, HeaderField, Session, Uid};

const TIMEOUT: Duration = Duration::from_secs(5);

fn uid(n: u32) -> Uid {
    Uid::new(n).unwrap()
}

#[tokio::test]
async fn test_full_run_with_move_capability() {
    let mock = Builder::new()
        .read(b"* OK [CAPABILITY IMAP4rev1 STARTTLS] ready\r\n")
        .write(b"A0000 LOGIN sorter hunter2\r\n")
        .read(b"A0000 OK [CAPABILITY IMAP4rev1 MOVE UIDPLUS] Logged in\r\n")
        .write(b"A0001 LIST \"\" \"*\"\r\n")
        .read(b"* LIST (\\HasChildren) \".\" INBOX\r\n")
        .read(b"* LIST (\\HasChildren) \".\" INBOX.Received\r\n")
        .read(b"* LIST (\\HasNoChildren) \".\" INBOX.Received.bob\r\n")
        .read(b"A0001 OK List completed\r\n")
        .write(b"A0002 SELECT INBOX\r\n")
        .read(b"* 2 EXISTS\r\n")
        .read(b"* OK [UIDVALIDITY 3857529045] UIDs valid\r\n")
        .read(b"A0002 OK [READ-WRITE] Select completed\r\n")
        .write(b"A0003 UID FETCH 1:* (UID BODY.PEEK[HEADER.FIELDS (ENVELOPE-TO)])\r\n")
        .read(b"* 2 FETCH (UID 11 BODY[HEADER.FIELDS (ENVELOPE-TO)] {38}\r\n")
        .read(b"Envelope-To: Bob <bob@example.com>\r\n\r\n)\r\n")
        .read(b"* 1 FETCH (UID 10 BODY[HEADER.FIELDS (ENVELOPE-TO)] {2}\r\n")
        .read(b"\r\n)\r\n")
        .read(b"A0003 OK Fetch completed\r\n")
        .write(b"A0004 CREATE INBOX.Received.alice\r\n")
        .read(b"A0004 OK Create completed\r\n")
        .write(b"A0005 UID MOVE 11 INBOX.Received.bob\r\n")
        .read(b"* OK [COPYUID 1 11 1] Moved UIDs.\r\n")
        .read(b"* 2 EXPUNGE\r\n")
        .read(b"A0005 OK Move completed\r\n")
        .write(b"A0006 LOGOUT\r\n")
        .read(b"* BYE Logging out\r\n")
        .read(b"A0006 OK Logout completed\r\n")
        .build();

    let mut session = Session::login(mock, "sorter", "hunter2", TIMEOUT)
        .await
        .unwrap();

    let folders = session.list_folders().await.unwrap();
    assert_eq!(folders.len(), 3);
    assert_eq!(folders[0].delimiter, Some('.'));

    let headers = session
        .fetch_header_field("INBOX", "Envelope-To")
        .await
        .unwrap();
    assert_eq!(
        headers,
        vec![
            HeaderField {
                uid: uid(10),
                value: String::new(),
            },
            HeaderField {
                uid: uid(11),
                value: "Bob <bob@example.com>".to_string(),
            },
        ]
    );

    session.create("INBOX.Received.alice").await.unwrap();
    session
        .move_message("INBOX", uid(11), "INBOX.Received.bob")
        .await
        .unwrap();

    session.logout().await.unwrap();
}

#[tokio::test]
async fn test_capabilities_are_requested_when_login_is_silent() {
    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0000 LOGIN u p\r\n")
        .read(b"A0000 OK Logged in\r\n")
        .write(b"A0001 CAPABILITY\r\n")
        .read(b"* CAPABILITY IMAP4rev1 MOVE\r\n")
        .read(b"A0001 OK Capability completed\r\n")
        .write(b"A0002 SELECT INBOX\r\n")
        .read(b"* 1 EXISTS\r\n")
        .read(b"A0002 OK [READ-WRITE] Select completed\r\n")
        .write(b"A0003 UID MOVE 5 INBOX.Received.carol\r\n")
        .read(b"A0003 OK Move completed\r\n")
        .build();

    let mut session = Session::login(mock, "u", "p", TIMEOUT).await.unwrap();
    session
        .move_message("INBOX", uid(5), "INBOX.Received.carol")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_greeting_capabilities_are_not_trusted_after_login() {
    let mock = Builder::new()
        .read(b"* OK [CAPABILITY IMAP4rev1 AUTH=PLAIN] ready\r\n")
        .write(b"A0000 LOGIN u p\r\n")
        .read(b"A0000 OK Logged in\r\n")
        .write(b"A0001 CAPABILITY\r\n")
        .read(b"* CAPABILITY IMAP4rev1 UIDPLUS MOVE\r\n")
        .read(b"A0001 OK Capability completed\r\n")
        .write(b"A0002 SELECT INBOX\r\n")
        .read(b"* 1 EXISTS\r\n")
        .read(b"A0002 OK [READ-WRITE] Select completed\r\n")
        .write(b"A0003 UID MOVE 5 Archive\r\n")
        .read(b"A0003 OK Move completed\r\n")
        .build();

    let mut session = Session::login(mock, "u", "p", TIMEOUT).await.unwrap();
    session.move_message("INBOX", uid(5), "Archive").await.unwrap();
}

#[tokio::test]
async fn test_move_falls_back_to_copy_and_expunge() {
    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0000 LOGIN u p\r\n")
        .read(b"A0000 OK Logged in\r\n")
        .write(b"A0001 CAPABILITY\r\n")
        .read(b"* CAPABILITY IMAP4rev1 IDLE\r\n")
        .read(b"A0001 OK Capability completed\r\n")
        .write(b"A0002 SELECT INBOX\r\n")
        .read(b"* 1 EXISTS\r\n")
        .read(b"A0002 OK [READ-WRITE] Select completed\r\n")
        .write(b"A0003 UID COPY 5 INBOX.Received.carol\r\n")
        .read(b"A0003 OK Copy completed\r\n")
        .write(b"A0004 UID STORE 5 +FLAGS.SILENT (\\Deleted)\r\n")
        .read(b"A0004 OK Store completed\r\n")
        .write(b"A0005 EXPUNGE\r\n")
        .read(b"* 1 EXPUNGE\r\n")
        .read(b"A0005 OK Expunge completed\r\n")
        .build();

    let mut session = Session::login(mock, "u", "p", TIMEOUT).await.unwrap();
    session
        .move_message("INBOX", uid(5), "INBOX.Received.carol")
        .await
        .unwrap();
    assert_eq!(session.selected_mailbox(), Some("INBOX"));
}

#[tokio::test]
async fn test_move_uses_uid_expunge_with_uidplus() {
    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0000 LOGIN u p\r\n")
        .read(b"A0000 OK [CAPABILITY IMAP4rev1 UIDPLUS] Logged in\r\n")
        .write(b"A0001 SELECT INBOX\r\n")
        .read(b"* 1 EXISTS\r\n")
        .read(b"A0001 OK [READ-WRITE] Select completed\r\n")
        .write(b"A0002 UID COPY 5 Archive\r\n")
        .read(b"A0002 OK Copy completed\r\n")
        .write(b"A0003 UID STORE 5 +FLAGS.SILENT (\\Deleted)\r\n")
        .read(b"A0003 OK Store completed\r\n")
        .write(b"A0004 UID EXPUNGE 5\r\n")
        .read(b"* 1 EXPUNGE\r\n")
        .read(b"A0004 OK Expunge completed\r\n")
        .build();

    let mut session = Session::login(mock, "u", "p", TIMEOUT).await.unwrap();
    session.move_message("INBOX", uid(5), "Archive").await.unwrap();
}

#[tokio::test]
async fn test_empty_mailbox_issues_no_fetch() {
    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0000 LOGIN u p\r\n")
        .read(b"A0000 OK [CAPABILITY IMAP4rev1] Logged in\r\n")
        .write(b"A0001 SELECT INBOX\r\n")
        .read(b"* 0 EXISTS\r\n")
        .read(b"A0001 OK [READ-WRITE] Select completed\r\n")
        .build();

    let mut session = Session::login(mock, "u", "p", TIMEOUT).await.unwrap();
    let headers = session
        .fetch_header_field("INBOX", "Envelope-To")
        .await
        .unwrap();
    assert!(headers.is_empty());
}

#[tokio::test]
async fn test_create_existing_folder_is_recognized() {
    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0000 LOGIN u p\r\n")
        .read(b"A0000 OK [CAPABILITY IMAP4rev1] Logged in\r\n")
        .write(b"A0001 CREATE INBOX.Received.bob\r\n")
        .read(b"A0001 NO Mailbox already exists\r\n")
        .write(b"A0002 CREATE INBOX.Received.x\r\n")
        .read(b"A0002 NO [NOPERM] Permission denied\r\n")
        .build();

    let mut session = Session::login(mock, "u", "p", TIMEOUT).await.unwrap();

    let err = session.create("INBOX.Received.bob").await.unwrap_err();
    assert!(err.is_already_exists());

    let err = session.create("INBOX.Received.x").await.unwrap_err();
    assert!(!err.is_already_exists());
    assert!(!session.is_closed());
}

#[tokio::test]
async fn test_non_ascii_folder_names_use_modified_utf7() {
    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0000 LOGIN u p\r\n")
        .read(b"A0000 OK [CAPABILITY IMAP4rev1 MOVE] Logged in\r\n")
        .write(b"A0001 LIST \"\" \"*\"\r\n")
        .read(b"* LIST (\\HasChildren) \".\" INBOX\r\n")
        .read(b"* LIST (\\HasNoChildren) \".\" INBOX.Received.j&APw-rgen\r\n")
        .read(b"A0001 OK List completed\r\n")
        .write(b"A0002 CREATE INBOX.Received.ren&AOk-e\r\n")
        .read(b"A0002 OK Create completed\r\n")
        .write(b"A0003 SELECT INBOX\r\n")
        .read(b"* 1 EXISTS\r\n")
        .read(b"A0003 OK [READ-WRITE] Select completed\r\n")
        .write(b"A0004 UID MOVE 8 INBOX.Received.j&APw-rgen\r\n")
        .read(b"A0004 OK Move completed\r\n")
        .build();

    let mut session = Session::login(mock, "u", "p", TIMEOUT).await.unwrap();

    let folders = session.list_folders().await.unwrap();
    let existing = folders[1].mailbox.as_str().to_string();
    assert_eq!(existing, "INBOX.Received.jürgen");

    session.create("INBOX.Received.renée").await.unwrap();
    session.move_message("INBOX", uid(8), &existing).await.unwrap();
}

#[tokio::test]
async fn test_refused_select_still_logs_out() {
    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0000 LOGIN u p\r\n")
        .read(b"A0000 OK [CAPABILITY IMAP4rev1] Logged in\r\n")
        .write(b"A0001 SELECT INBOX.Received\r\n")
        .read(b"A0001 NO [NONEXISTENT] Unknown mailbox\r\n")
        .write(b"A0002 LOGOUT\r\n")
        .read(b"* BYE Logging out\r\n")
        .read(b"A0002 OK Logout completed\r\n")
        .build();

    let mut session = Session::login(mock, "u", "p", TIMEOUT).await.unwrap();

    let err = session.select("INBOX.Received").await.unwrap_err();
    assert!(matches!(err, Error::No(_)));
    assert!(!session.is_closed());
    assert_eq!(session.selected_mailbox(), None);

    session.logout().await.unwrap();
}

#[tokio::test]
async fn test_failed_move_reports_error_and_session_survives() {
    let mock = Builder::new()
        .read(b"* OK ready\r\n")
        .write(b"A0000 LOGIN u p\r\n")
        .read(b"A0000 OK [CAPABILITY IMAP4rev1 MOVE] Logged in\r\n")
        .write(b"A0001 SELECT INBOX\r\n")
        .read(b"* 2 EXISTS\r\n")
        .read(b"A0001 OK [READ-WRITE] Select completed\r\n")
        .write(b"A0002 UID MOVE 3 INBOX.Received.gone\r\n")
        .read(b"A0002 NO [TRYCREATE] Mailbox doesn't exist\r\n")
        .write(b"A0003 UID MOVE 4 INBOX.Received.bob\r\n")
        .read(b"A0003 OK Move completed\r\n")
        .build();

    let mut session = Session::login(mock, "u", "p", TIMEOUT).await.unwrap();

    let err = session
        .move_message("INBOX", uid(3), "INBOX.Received.gone")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::No(_)));

    session
        .move_message("INBOX", uid(4), "INBOX.Received.bob")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_bye_greeting_fails_login() {
    let mock = Builder::new().read(b"* BYE shutting down\r\n").build();

    let result = Session::login(mock, "u", "p", TIMEOUT).await;
    assert!(matches!(result, Err(Error::Bye(_))));
}
