//! HTML rendering for the roster pages.
//!
//! A [`Renderer`] is built once at startup and shared through the
//! application state. Pages are emitted as a stream of `quick_xml` events,
//! so text and attribute values are escaped by the writer.

use std::{
  io::{self, Cursor},
  path::Path,
};

use quick_xml::{
  Writer,
  events::{BytesEnd, BytesStart, BytesText, Event},
};
use rollbook_core::{since::time_since, student::Student};
use serde::Serialize;

/// Static page served to browsers the app does not support.
pub const UNSUPPORTED_TEMPLATE_FILE: &str = "browser_not_supported.html";

/// `?ack=` value the list pages turn into a "saved" notice.
pub const ACK_SAVED: &str = "saved";

pub const SAVED_MESSAGE: &str = "The student has been saved";

type HtmlWriter = Writer<Cursor<Vec<u8>>>;

// ─── View models ──────────────────────────────────────────────────────────────

/// A student as shown on a page.
#[derive(Debug, Clone, Serialize)]
pub struct StudentView {
  pub id:        String,
  pub name:      String,
  pub submitted: bool,
  /// Relative age of `submission_time`, e.g. `"3 hours ago"`.
  pub since:     String,
}

impl From<Student> for StudentView {
  fn from(s: Student) -> Self {
    Self {
      since:     time_since(&s.submission_time.to_string()),
      id:        s.id.into(),
      name:      s.name,
      submitted: s.submission_status,
    }
  }
}

/// Which list a page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
  All,
  Submitted,
}

/// A bulk action offered above the student list.
#[derive(Debug, Clone)]
pub struct Action {
  pub icon:  &'static str,
  pub link:  &'static str,
  pub label: &'static str,
}

#[derive(Debug, Clone)]
pub struct StudentPage {
  pub title:    String,
  pub tab:      Tab,
  pub actions:  Vec<Action>,
  pub students: Vec<StudentView>,
  /// Notice shown above the list, from the `?ack=` query parameter.
  pub message:  Option<String>,
}

impl StudentPage {
  /// Page for `tab` listing `students`, with the actions that fit the tab.
  pub fn new(tab: Tab, students: Vec<Student>) -> Self {
    let mut actions = Vec::with_capacity(2);
    match tab {
      Tab::All => actions.push(Action {
        icon:  "fa fa-star",
        link:  "/submit/",
        label: "Mark as submitted",
      }),
      Tab::Submitted => actions.push(Action {
        icon:  "fa fa-star-o",
        link:  "/unsubmit/",
        label: "Mark as not submitted",
      }),
    }
    actions.push(Action { icon: "fa fa-trash", link: "/delete/", label: "Delete student" });

    let title = match tab {
      Tab::All => "All | Students",
      Tab::Submitted => "Submitted | Students",
    };

    Self {
      title: title.to_owned(),
      tab,
      actions,
      students: students.into_iter().map(StudentView::from).collect(),
      message: None,
    }
  }

  /// Attach the notice named by an `?ack=` value. Unknown values are ignored.
  pub fn with_ack(mut self, ack: Option<&str>) -> Self {
    self.message = match ack {
      Some(ACK_SAVED) => Some(SAVED_MESSAGE.to_owned()),
      _ => None,
    };
    self
  }
}

/// The add / edit student form.
#[derive(Debug, Clone, Default)]
pub struct StudentForm {
  /// Id of the student being edited; `None` when adding.
  pub original: Option<String>,
  pub id:       String,
  pub name:     String,
  pub error:    Option<String>,
}

impl StudentForm {
  pub fn editing(student: &Student) -> Self {
    Self {
      original: Some(student.id.to_string()),
      id:       student.id.to_string(),
      name:     student.name.clone(),
      ..Self::default()
    }
  }
}

// ─── Renderer ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Renderer {
  unsupported_page: Option<String>,
}

impl Renderer {
  /// Build a renderer, loading static pages from `templates_dir` if given.
  pub fn load(templates_dir: Option<&Path>) -> io::Result<Self> {
    let unsupported_page = templates_dir
      .map(|dir| std::fs::read_to_string(dir.join(UNSUPPORTED_TEMPLATE_FILE)))
      .transpose()?;
    Ok(Self { unsupported_page })
  }

  pub fn unsupported_browser(&self) -> Option<&str> { self.unsupported_page.as_deref() }

  pub fn student_list(&self, page: &StudentPage) -> io::Result<String> {
    document(&page.title, |w| {
      tabs(w, page.tab)?;
      if let Some(msg) = &page.message {
        text_elem(w, "p", &[("class", "page-message")], msg)?;
      }

      start(w, "form", &[("method", "post"), ("id", "students")])?;
      start(w, "div", &[("class", "actions")])?;
      for action in &page.actions {
        start(w, "button", &[("type", "submit"), ("formaction", action.link)])?;
        start(w, "i", &[("class", action.icon)])?;
        end(w, "i")?;
        text(w, &format!(" {}", action.label))?;
        end(w, "button")?;
      }
      text_elem(w, "a", &[("class", "add"), ("href", "/input/")], "Add student")?;
      end(w, "div")?;

      if page.students.is_empty() {
        text_elem(w, "p", &[("class", "empty")], "No students.")?;
      } else {
        student_table(w, &page.students)?;
      }
      end(w, "form")?;

      start(w, "script", &[])?;
      w.write_event(Event::Text(BytesText::from_escaped(REMOVE_SCRIPT)))
        .map_err(io::Error::other)?;
      end(w, "script")
    })
  }

  pub fn student_form(&self, form: &StudentForm) -> io::Result<String> {
    let heading = if form.original.is_some() { "Edit student" } else { "Add student" };

    document(heading, |w| {
      text_elem(w, "h1", &[], heading)?;
      if let Some(err) = &form.error {
        text_elem(w, "p", &[("class", "form-error")], err)?;
      }

      start(w, "form", &[("method", "post"), ("action", "/input/")])?;
      if let Some(original) = &form.original {
        void(w, "input", &[("type", "hidden"), ("name", "original"), ("value", original.as_str())])?;
      }

      start(w, "label", &[])?;
      text(w, "Student id ")?;
      void(
        w,
        "input",
        &[("name", "id"), ("value", form.id.as_str()), ("required", "required"), ("autofocus", "autofocus")],
      )?;
      end(w, "label")?;

      start(w, "label", &[])?;
      text(w, "Name ")?;
      void(w, "input", &[("name", "name"), ("value", form.name.as_str()), ("required", "required")])?;
      end(w, "label")?;

      text_elem(w, "button", &[("type", "submit")], "Save")?;
      text_elem(w, "a", &[("href", "/stulist/")], "Cancel")?;
      end(w, "form")
    })
  }
}

// ─── Page pieces ──────────────────────────────────────────────────────────────

/// Write a complete document titled `title`, with `body` filling `<body>`.
fn document<F>(title: &str, body: F) -> io::Result<String>
where
  F: FnOnce(&mut HtmlWriter) -> io::Result<()>,
{
  let mut writer = Writer::new(Cursor::new(Vec::new()));
  let w = &mut writer;

  w.write_event(Event::DocType(BytesText::from_escaped("html")))
    .map_err(io::Error::other)?;
  start(w, "html", &[])?;
  start(w, "head", &[])?;
  void(w, "meta", &[("charset", "utf-8")])?;
  text_elem(w, "title", &[], title)?;
  void(w, "link", &[("rel", "stylesheet"), ("href", "/css/style.css")])?;
  end(w, "head")?;

  start(w, "body", &[])?;
  body(w)?;
  end(w, "body")?;
  end(w, "html")?;

  String::from_utf8(writer.into_inner().into_inner()).map_err(io::Error::other)
}

fn tabs(w: &mut HtmlWriter, active: Tab) -> io::Result<()> {
  start(w, "nav", &[])?;
  for (tab, href, label) in [(Tab::All, "/stulist/", "All"), (Tab::Submitted, "/submitted/", "Submitted")] {
    if tab == active {
      text_elem(w, "a", &[("href", href), ("class", "active")], label)?;
    } else {
      text_elem(w, "a", &[("href", href)], label)?;
    }
  }
  end(w, "nav")
}

fn student_table(w: &mut HtmlWriter, students: &[StudentView]) -> io::Result<()> {
  start(w, "table", &[])?;
  start(w, "thead", &[])?;
  start(w, "tr", &[])?;
  for heading in ["", "Id", "Name", "Status", "Added", ""] {
    text_elem(w, "th", &[], heading)?;
  }
  end(w, "tr")?;
  end(w, "thead")?;

  start(w, "tbody", &[])?;
  for s in students {
    let status = if s.submitted { "submitted" } else { "missing" };
    let edit = format!("/input/?student={}", s.id);

    start(w, "tr", &[("class", status)])?;

    start(w, "td", &[])?;
    void(w, "input", &[("type", "checkbox"), ("name", "student"), ("value", s.id.as_str())])?;
    end(w, "td")?;

    start(w, "td", &[])?;
    text_elem(w, "a", &[("href", edit.as_str())], &s.id)?;
    end(w, "td")?;

    text_elem(w, "td", &[], &s.name)?;
    text_elem(w, "td", &[], status)?;
    text_elem(w, "td", &[], &s.since)?;

    start(w, "td", &[])?;
    text_elem(
      w,
      "button",
      &[("type", "button"), ("class", "remove"), ("data-student", s.id.as_str())],
      "\u{d7}",
    )?;
    end(w, "td")?;

    end(w, "tr")?;
  }
  end(w, "tbody")?;
  end(w, "table")
}

// ─── Writer helpers ───────────────────────────────────────────────────────────

fn element<'a>(tag: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
  let mut el = BytesStart::new(tag);
  for (k, v) in attrs {
    el.push_attribute((*k, *v));
  }
  el
}

fn start(w: &mut HtmlWriter, tag: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
  w.write_event(Event::Start(element(tag, attrs))).map_err(io::Error::other)
}

fn end(w: &mut HtmlWriter, tag: &str) -> io::Result<()> {
  w.write_event(Event::End(BytesEnd::new(tag))).map_err(io::Error::other)
}

/// A void element such as `<input>` or `<meta>`.
fn void(w: &mut HtmlWriter, tag: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
  w.write_event(Event::Empty(element(tag, attrs))).map_err(io::Error::other)
}

fn text(w: &mut HtmlWriter, content: &str) -> io::Result<()> {
  w.write_event(Event::Text(BytesText::new(content))).map_err(io::Error::other)
}

fn text_elem(w: &mut HtmlWriter, tag: &str, attrs: &[(&str, &str)], content: &str) -> io::Result<()> {
  start(w, tag, attrs)?;
  text(w, content)?;
  end(w, tag)
}

/// Wires the per-row remove buttons to `POST /remove/`.
const REMOVE_SCRIPT: &str = r#"
document.querySelectorAll("button.remove").forEach(function (btn) {
  btn.addEventListener("click", function () {
    fetch("/remove/", {
      method: "POST",
      headers: { "Content-Type": "application/x-www-form-urlencoded" },
      body: "studentId=" + encodeURIComponent(btn.dataset.student)
    }).then(function (r) { return r.json(); }).then(function (ack) {
      if (ack.err) { alert(ack.err); } else { btn.closest("tr").remove(); }
    });
  });
});
"#;
