use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;

use crate::report::ReportRow;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(&'static str),
    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}

#[derive(Debug, Clone)]
pub struct Course {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct StudentWithCourse {
    pub id: i64,
    pub full_name: String,
    pub student_number: Option<String>,
    pub photo_path: Option<String>,
    pub course_id: i64,
    pub course_name: String,
}

/// Roster row handed to the name matcher: iteration order is the store's
/// insertion order, which the matcher's tie-break depends on.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub id: i64,
    pub full_name: String,
}

/// Open the database without touching the schema. Handlers use this once per
/// request; the schema is guaranteed by the startup `open_db` call.
pub fn connect(path: &Path) -> Result<Connection, StoreError> {
    Ok(Connection::open(path)?)
}

/// Open the database and create the three tables if absent. Safe to call on
/// every startup.
///
/// The students.course_id foreign key is declarative only: enforcement stays
/// off so a student row may outlive its course. Listing joins are responsible
/// for hiding such rows.
pub fn open_db(path: &Path) -> anyhow::Result<Connection> {
    let conn = Connection::open(path)?;
    // Enforcement stays off (see doc comment above); this build's SQLite
    // defaults the pragma on, so set it back explicitly.
    conn.pragma_update(None, "foreign_keys", false)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS courses(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS students(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            full_name TEXT NOT NULL,
            student_number TEXT,
            photo_path TEXT,
            course_id INTEGER,
            FOREIGN KEY(course_id) REFERENCES courses(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_students_course ON students(course_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS attendance(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id INTEGER,
            course_id INTEGER,
            attended INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY(student_id) REFERENCES students(id),
            FOREIGN KEY(course_id) REFERENCES courses(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_attendance_student ON attendance(student_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_attendance_course ON attendance(course_id)",
        [],
    )?;

    Ok(conn)
}

pub fn add_course(conn: &Connection, name: &str) -> Result<i64, StoreError> {
    if name.is_empty() {
        return Err(StoreError::Validation("course name must not be empty"));
    }
    conn.execute("INSERT INTO courses(name) VALUES(?)", [name])?;
    Ok(conn.last_insert_rowid())
}

pub fn list_courses(conn: &Connection) -> Result<Vec<Course>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, name FROM courses ORDER BY id")?;
    let rows = stmt
        .query_map([], |r| {
            Ok(Course {
                id: r.get(0)?,
                name: r.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn course_name(conn: &Connection, course_id: i64) -> Result<Option<String>, StoreError> {
    let name = conn
        .query_row("SELECT name FROM courses WHERE id = ?", [course_id], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(name)
}

pub fn add_student(
    conn: &Connection,
    full_name: &str,
    student_number: Option<&str>,
    photo_path: &str,
    course_id: i64,
) -> Result<i64, StoreError> {
    if full_name.is_empty() {
        return Err(StoreError::Validation("student name must not be empty"));
    }
    conn.execute(
        "INSERT INTO students(full_name, student_number, photo_path, course_id)
         VALUES(?, ?, ?, ?)",
        (full_name, student_number, photo_path, course_id),
    )?;
    Ok(conn.last_insert_rowid())
}

/// Delete a student and every attendance row referencing it. A no-op when the
/// id does not exist.
pub fn delete_student(conn: &Connection, student_id: i64) -> Result<(), StoreError> {
    conn.execute("DELETE FROM attendance WHERE student_id = ?", [student_id])?;
    conn.execute("DELETE FROM students WHERE id = ?", [student_id])?;
    Ok(())
}

/// Delete a student scoped to one course, plus that course's attendance rows
/// for the student. Both deletes filter on BOTH ids; nothing happens when no
/// row matches.
pub fn remove_student_from_course(
    conn: &Connection,
    student_id: i64,
    course_id: i64,
) -> Result<(), StoreError> {
    conn.execute(
        "DELETE FROM attendance WHERE student_id = ? AND course_id = ?",
        (student_id, course_id),
    )?;
    conn.execute(
        "DELETE FROM students WHERE id = ? AND course_id = ?",
        (student_id, course_id),
    )?;
    Ok(())
}

/// Inner join: a student whose course row is gone is silently excluded.
pub fn list_students_with_course(conn: &Connection) -> Result<Vec<StudentWithCourse>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.full_name, s.student_number, s.photo_path, s.course_id, c.name
         FROM students s
         JOIN courses c ON s.course_id = c.id
         ORDER BY s.id",
    )?;
    let rows = stmt
        .query_map([], |r| {
            Ok(StudentWithCourse {
                id: r.get(0)?,
                full_name: r.get(1)?,
                student_number: r.get(2)?,
                photo_path: r.get(3)?,
                course_id: r.get(4)?,
                course_name: r.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn list_students_for_course(
    conn: &Connection,
    course_id: i64,
) -> Result<Vec<RosterEntry>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT id, full_name FROM students WHERE course_id = ? ORDER BY id")?;
    let rows = stmt
        .query_map([course_id], |r| {
            Ok(RosterEntry {
                id: r.get(0)?,
                full_name: r.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Always inserts a fresh row: a student matched twice in one session yields
/// two rows, and the report shows both.
pub fn record_attendance(
    conn: &Connection,
    student_id: i64,
    course_id: i64,
    attended: bool,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO attendance(student_id, course_id, attended) VALUES(?, ?, ?)",
        (student_id, course_id, attended),
    )?;
    Ok(())
}

/// Left join from students to attendance on student id only. Students never
/// matched carry `attended = None`; the report renders None and Some(false)
/// identically.
pub fn course_attendance_report(
    conn: &Connection,
    course_id: i64,
) -> Result<Vec<ReportRow>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT s.full_name, s.student_number, s.photo_path, a.attended
         FROM students s
         LEFT JOIN attendance a ON s.id = a.student_id
         WHERE s.course_id = ?
         ORDER BY s.id",
    )?;
    let rows = stmt
        .query_map([course_id], |r| {
            Ok(ReportRow {
                full_name: r.get(0)?,
                student_number: r.get(1)?,
                photo_path: r.get(2)?,
                attended: r.get::<_, Option<i64>>(3)?.map(|v| v != 0),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
