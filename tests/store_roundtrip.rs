use rusqlite::Connection;
use tempfile::TempDir;

use yoklamad::db::{self, StoreError};
use yoklamad::media::MediaStore;

fn open_store(dir: &TempDir) -> Connection {
    db::open_db(&dir.path().join("school.db")).expect("open db")
}

#[test]
fn schema_init_is_idempotent() {
    let dir = TempDir::new().expect("temp dir");
    let _first = open_store(&dir);
    let conn = open_store(&dir);

    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type = 'table' AND name IN ('courses', 'students', 'attendance')",
            [],
            |r| r.get(0),
        )
        .expect("count tables");
    assert_eq!(tables, 3);
}

#[test]
fn add_course_then_list_returns_exact_name_and_unique_ids() {
    let dir = TempDir::new().expect("temp dir");
    let conn = open_store(&dir);

    let math = db::add_course(&conn, "Math101").expect("add Math101");
    let physics = db::add_course(&conn, "Physics202").expect("add Physics202");
    assert_ne!(math, physics);

    let courses = db::list_courses(&conn).expect("list");
    let names: Vec<&str> = courses.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Math101", "Physics202"]);
}

#[test]
fn empty_course_name_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let conn = open_store(&dir);

    let err = db::add_course(&conn, "").expect_err("empty name must fail");
    assert!(matches!(err, StoreError::Validation(_)));
    assert!(db::list_courses(&conn).expect("list").is_empty());
}

#[test]
fn listing_joins_course_name_and_hides_orphans() {
    let dir = TempDir::new().expect("temp dir");
    let conn = open_store(&dir);

    let math = db::add_course(&conn, "Math101").expect("add course");
    let orphan_course = db::add_course(&conn, "Doomed").expect("add course");
    db::add_student(&conn, "Jane Doe", Some("1234"), "static/uploads/jane.jpg", math)
        .expect("add student");
    db::add_student(&conn, "Lost Student", None, "static/uploads/lost.jpg", orphan_course)
        .expect("add student");

    // Drop the course row out from under the second student; the inner join
    // must hide the orphan without failing.
    conn.execute("DELETE FROM courses WHERE id = ?", [orphan_course])
        .expect("raw course delete");

    let listed = db::list_students_with_course(&conn).expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].full_name, "Jane Doe");
    assert_eq!(listed[0].student_number.as_deref(), Some("1234"));
    assert_eq!(listed[0].course_name, "Math101");
}

#[test]
fn delete_student_cascades_attendance_and_repeats_as_noop() {
    let dir = TempDir::new().expect("temp dir");
    let conn = open_store(&dir);

    let math = db::add_course(&conn, "Math101").expect("add course");
    let jane = db::add_student(&conn, "Jane Doe", None, "static/uploads/jane.jpg", math)
        .expect("add student");
    db::record_attendance(&conn, jane, math, true).expect("record");
    db::record_attendance(&conn, jane, math, true).expect("record again");

    db::delete_student(&conn, jane).expect("delete");
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM attendance", [], |r| r.get(0))
        .expect("count attendance");
    assert_eq!(rows, 0);
    assert!(db::list_students_for_course(&conn, math)
        .expect("roster")
        .is_empty());

    // Deleting a missing id is a no-op, not an error.
    db::delete_student(&conn, jane).expect("repeat delete");
}

#[test]
fn remove_student_from_course_filters_on_both_ids() {
    let dir = TempDir::new().expect("temp dir");
    let conn = open_store(&dir);

    let math = db::add_course(&conn, "Math101").expect("add course");
    let other = db::add_course(&conn, "Physics202").expect("add course");
    let jane = db::add_student(&conn, "Jane Doe", None, "static/uploads/jane.jpg", math)
        .expect("add student");
    db::record_attendance(&conn, jane, math, true).expect("record");

    // Wrong course id: nothing happens.
    db::remove_student_from_course(&conn, jane, other).expect("mismatched remove");
    assert_eq!(db::list_students_for_course(&conn, math).expect("roster").len(), 1);

    db::remove_student_from_course(&conn, jane, math).expect("scoped remove");
    assert!(db::list_students_for_course(&conn, math)
        .expect("roster")
        .is_empty());
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM attendance", [], |r| r.get(0))
        .expect("count attendance");
    assert_eq!(rows, 0);
}

#[test]
fn report_rows_carry_null_for_never_matched_students() {
    let dir = TempDir::new().expect("temp dir");
    let conn = open_store(&dir);

    let math = db::add_course(&conn, "Math101").expect("add course");
    let jane = db::add_student(&conn, "Jane Doe", Some("1234"), "static/uploads/jane.jpg", math)
        .expect("add student");
    db::add_student(&conn, "Ali Demir", None, "static/uploads/ali.jpg", math)
        .expect("add student");
    db::record_attendance(&conn, jane, math, true).expect("record");

    let rows = db::course_attendance_report(&conn, math).expect("report rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].full_name, "Jane Doe");
    assert_eq!(rows[0].attended, Some(true));
    assert_eq!(rows[1].full_name, "Ali Demir");
    assert_eq!(rows[1].attended, None);
}

#[test]
fn rejected_photo_never_creates_a_student() {
    let dir = TempDir::new().expect("temp dir");
    let conn = open_store(&dir);
    db::add_course(&conn, "Math101").expect("add course");

    // Enrollment stores the photo before it touches the students table, so a
    // rejected upload must leave the table empty.
    let media = MediaStore::new(dir.path().join("uploads"));
    media.ensure_root().expect("ensure upload dir");
    media
        .save("notes.txt", b"not an image")
        .expect_err("disallowed extension must fail");

    let students: i64 = conn
        .query_row("SELECT COUNT(*) FROM students", [], |r| r.get(0))
        .expect("count students");
    assert_eq!(students, 0);
}

#[test]
fn attendance_always_inserts_a_fresh_row() {
    let dir = TempDir::new().expect("temp dir");
    let conn = open_store(&dir);

    let math = db::add_course(&conn, "Math101").expect("add course");
    let jane = db::add_student(&conn, "Jane Doe", None, "static/uploads/jane.jpg", math)
        .expect("add student");
    db::record_attendance(&conn, jane, math, true).expect("first");
    db::record_attendance(&conn, jane, math, true).expect("second");

    // No dedup: the left join fans out to one report row per attendance row.
    let rows = db::course_attendance_report(&conn, math).expect("report rows");
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.attended == Some(true)));
}
