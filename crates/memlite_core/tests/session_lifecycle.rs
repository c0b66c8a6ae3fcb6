use memlite_core::db::open_db_in_memory;
use memlite_core::{SessionError, SqlValue, SqliteSession, NOT_CONNECTED_MESSAGE};
use rusqlite::ffi;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn connect_twice_keeps_existing_data() {
    let session = SqliteSession::new();
    session.connect().unwrap();
    session
        .execute("CREATE TABLE t (a INT, b TEXT);", &[])
        .unwrap();
    session
        .execute(
            "INSERT INTO t VALUES (?, ?);",
            &[SqlValue::Integer(1), SqlValue::Text("x".to_string())],
        )
        .unwrap();

    session.connect().unwrap();

    let rows = session.execute("SELECT a, b FROM t;", &[]).unwrap();
    assert_eq!(
        rows,
        vec![vec![SqlValue::Integer(1), SqlValue::Text("x".to_string())]]
    );
}

#[test]
fn execute_before_connect_is_a_precondition_error() {
    let session = SqliteSession::new();

    let err = session.execute("SELECT 1;", &[]).unwrap_err();
    assert!(matches!(err, SessionError::NotConnected));
    assert!(err.is_precondition());
    assert_eq!(err.to_string(), NOT_CONNECTED_MESSAGE);
    assert!(!session.is_connected());
}

#[test]
fn failed_open_leaves_session_retryable() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let session = SqliteSession::with_opener(Box::new(move || {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(rusqlite::Error::SqliteFailure(
                ffi::Error::new(ffi::SQLITE_CANTOPEN),
                Some("unable to open database".to_string()),
            ))
        } else {
            open_db_in_memory()
        }
    }));

    let err = session.connect().unwrap_err();
    assert!(matches!(err, SessionError::Sqlite(_)));
    assert!(err.to_string().contains("unable to open database"));
    assert!(!session.is_connected());

    session.connect().unwrap();
    assert!(session.is_connected());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn concurrent_connects_open_exactly_one_connection() {
    let opened = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&opened);
    let session = Arc::new(SqliteSession::with_opener(Box::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        open_db_in_memory()
    })));

    let handles = (0..8)
        .map(|_| {
            let session = Arc::clone(&session);
            thread::spawn(move || session.connect())
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert_eq!(opened.load(Ordering::SeqCst), 1);
    assert!(session.is_connected());
}

#[test]
fn concurrent_inserts_are_serialized() {
    let session = Arc::new(SqliteSession::new());
    session.connect().unwrap();
    session
        .execute("CREATE TABLE counter (n INTEGER);", &[])
        .unwrap();

    let handles = (0..4)
        .map(|worker| {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                for step in 0..25 {
                    session
                        .execute(
                            "INSERT INTO counter VALUES (?);",
                            &[SqlValue::Integer(worker * 100 + step)],
                        )
                        .unwrap();
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }

    let rows = session
        .execute("SELECT COUNT(*) FROM counter;", &[])
        .unwrap();
    assert_eq!(rows, vec![vec![SqlValue::Integer(100)]]);
}
