use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use crate::db::{self, Course, StudentWithCourse};
use crate::http::types::AppState;

/// One-shot notification carried back from a redirect.
#[derive(Debug, Default, Deserialize)]
pub struct Flash {
    pub kind: Option<String>,
    pub msg: Option<String>,
}

pub async fn index(State(state): State<Arc<AppState>>, Query(flash): Query<Flash>) -> Response {
    let conn = match db::connect(&state.config.db_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("store open failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "database error").into_response();
        }
    };

    let courses = match db::list_courses(&conn) {
        Ok(c) => c,
        Err(e) => {
            log::error!("course listing failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "database error").into_response();
        }
    };
    let students = match db::list_students_with_course(&conn) {
        Ok(s) => s,
        Err(e) => {
            log::error!("student listing failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "database error").into_response();
        }
    };

    Html(render_index(&flash, &courses, &students)).into_response()
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html("<h1>404</h1><p>No such page.</p>")).into_response()
}

fn render_index(flash: &Flash, courses: &[Course], students: &[StudentWithCourse]) -> String {
    let mut page = String::with_capacity(4096);
    page.push_str(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Classroom Attendance</title>\n<style>\n\
         body{font-family:sans-serif;max-width:56rem;margin:2rem auto;}\n\
         .flash.success{color:#0a6;}\n.flash.error{color:#c33;}\n\
         table{border-collapse:collapse;}td,th{border:1px solid #999;padding:.3rem .6rem;}\n\
         img.thumb{width:50px;height:50px;object-fit:cover;}\n\
         </style>\n</head>\n<body>\n<h1>Classroom Attendance</h1>\n",
    );

    if let (Some(kind), Some(msg)) = (flash.kind.as_deref(), flash.msg.as_deref()) {
        let class = if kind == "success" { "success" } else { "error" };
        page.push_str(&format!(
            "<p class=\"flash {}\">{}</p>\n",
            class,
            html_escape(msg)
        ));
    }

    page.push_str("<h2>Courses</h2>\n<ul>\n");
    for course in courses {
        page.push_str(&format!(
            "<li>{} \
             <button onclick=\"takeAttendance({})\">Take attendance</button> \
             <a href=\"/rapor_olustur/{}\">Report</a></li>\n",
            html_escape(&course.name),
            course.id,
            course.id
        ));
    }
    page.push_str("</ul>\n");

    page.push_str(
        "<h3>Add course</h3>\n\
         <form method=\"post\" action=\"/ders_ekle\">\n\
         <input name=\"ders_adi\" placeholder=\"Course name\">\n\
         <button type=\"submit\">Add</button>\n</form>\n",
    );

    page.push_str(
        "<h3>Add student</h3>\n\
         <form method=\"post\" action=\"/ogrenci_ekle\" enctype=\"multipart/form-data\">\n\
         <input name=\"tam_adi\" placeholder=\"Full name\">\n\
         <input name=\"ogrenci_numarasi\" placeholder=\"Student number\">\n\
         <select name=\"ders_id\">\n",
    );
    for course in courses {
        page.push_str(&format!(
            "<option value=\"{}\">{}</option>\n",
            course.id,
            html_escape(&course.name)
        ));
    }
    page.push_str(
        "</select>\n<input type=\"file\" name=\"foto\">\n\
         <button type=\"submit\">Add</button>\n</form>\n",
    );

    page.push_str(
        "<h2>Students</h2>\n<table>\n\
         <tr><th>Photo</th><th>Name</th><th>Number</th><th>Course</th><th></th></tr>\n",
    );
    for student in students {
        let thumb = student
            .photo_path
            .as_deref()
            .and_then(|p| std::path::Path::new(p).file_name())
            .map(|f| {
                format!(
                    "<img class=\"thumb\" src=\"/uploads/{}\" alt=\"\">",
                    f.to_string_lossy()
                )
            })
            .unwrap_or_default();
        page.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td><a href=\"/ogrenci_sil/{}\">Delete</a> \
             <a href=\"/ogrenciyi_dersten_sil/{}/{}\">Remove from course</a></td></tr>\n",
            thumb,
            html_escape(&student.full_name),
            html_escape(student.student_number.as_deref().unwrap_or("")),
            html_escape(&student.course_name),
            student.id,
            student.id,
            student.course_id
        ));
    }
    page.push_str("</table>\n");

    page.push_str(
        "<script>\n\
         async function takeAttendance(courseId) {\n\
           const res = await fetch('/yoklama_al', {\n\
             method: 'POST',\n\
             body: new URLSearchParams({ ders_id: courseId })\n\
           });\n\
           const data = await res.json();\n\
           alert(data.message);\n\
           if (data.status === 'success') location.reload();\n\
         }\n\
         </script>\n</body>\n</html>\n",
    );

    page
}

fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_in_names() {
        assert_eq!(html_escape("<b>Ali</b>"), "&lt;b&gt;Ali&lt;/b&gt;");
        assert_eq!(html_escape("Tom & Jerry"), "Tom &amp; Jerry");
    }

    #[test]
    fn index_page_lists_courses_and_flash() {
        let flash = Flash {
            kind: Some("success".into()),
            msg: Some("Course added".into()),
        };
        let courses = vec![Course {
            id: 1,
            name: "Math101".into(),
        }];
        let html = render_index(&flash, &courses, &[]);
        assert!(html.contains("Math101"));
        assert!(html.contains("Course added"));
        assert!(html.contains("/rapor_olustur/1"));
    }
}
