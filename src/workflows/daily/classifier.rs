//! Single-line classification for technician daily updates.
//!
//! Every line falls into exactly one category; classification is total and
//! never fails. Attribution of unlabeled lines relies on the "active
//! subject" (the technician most recently introduced by a name line),
//! which is threaded through [`classify`] explicitly rather than held in
//! shared state.

/// Category assigned to a technician-introduction line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Suspended,
    OnLeave,
    Training,
    /// Remainder of the line after the technician name. May be empty; an
    /// empty description is still one task entry.
    Task(String),
}

/// Outcome of classifying one trimmed, non-empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    Technician {
        name: String,
        disposition: Disposition,
    },
    ContractorNote(String),
    MaterialNote(String),
    /// Unlabeled line attributed to the current active subject.
    Continuation {
        technician: String,
        task: String,
    },
    /// Non-marker line with no active subject to attach to. Dropping it is
    /// policy, not an error.
    Dropped,
}

/// How a marker keyword is matched against the line.
enum Marker {
    Exact(&'static str),
    AnyCase(&'static str),
}

impl Marker {
    fn matches(&self, line: &str) -> bool {
        match self {
            Marker::Exact(keyword) => line.contains(keyword),
            Marker::AnyCase(keyword) => line.to_ascii_lowercase().contains(keyword),
        }
    }
}

/// Contractor markers outrank material markers; both are checked only when
/// the line did not introduce a technician.
static CONTRACTOR_MARKERS: [Marker; 5] = [
    Marker::Exact("Marshall"),
    Marker::AnyCase("contractor"),
    Marker::Exact("SSI"),
    Marker::Exact("Tencarva"),
    Marker::Exact("A&H"),
];

static MATERIAL_MARKERS: [Marker; 2] = [Marker::AnyCase("material"), Marker::AnyCase("need")];

fn matches_any(line: &str, markers: &[Marker]) -> bool {
    markers.iter().any(|marker| marker.matches(line))
}

/// Matches the name convention used in update text: a capitalized word
/// (one ASCII uppercase letter, one or more ASCII lowercase letters)
/// immediately followed by whitespace. Returns the matched word.
///
/// Any word of that shape is indistinguishable from a technician name;
/// that ambiguity is inherent to the input convention and left alone.
pub fn leading_subject(line: &str) -> Option<&str> {
    let mut chars = line.chars();
    if !chars.next()?.is_ascii_uppercase() {
        return None;
    }

    let mut len = 1;
    for ch in chars {
        if ch.is_ascii_lowercase() {
            len += 1;
        } else if ch.is_whitespace() && len > 1 {
            return Some(&line[..len]);
        } else {
            return None;
        }
    }

    None
}

fn disposition_for(line: &str, name: &str) -> Disposition {
    if line.contains("Suspended") {
        return Disposition::Suspended;
    }
    if line.contains("PTO") {
        return Disposition::OnLeave;
    }
    let lowered = line.to_ascii_lowercase();
    if lowered.contains("training") || lowered.contains("tests") {
        return Disposition::Training;
    }

    Disposition::Task(line[name.len()..].trim().to_string())
}

/// Classifies one line and returns the active subject that applies to the
/// lines after it. A name match always installs a new active subject, even
/// when the rest of the line carries contractor or material keywords; every
/// other branch passes the incoming subject through untouched.
pub fn classify(line: &str, active: Option<String>) -> (LineClass, Option<String>) {
    if let Some(name) = leading_subject(line) {
        let class = LineClass::Technician {
            name: name.to_string(),
            disposition: disposition_for(line, name),
        };
        return (class, Some(name.to_string()));
    }

    if matches_any(line, &CONTRACTOR_MARKERS) {
        return (LineClass::ContractorNote(line.to_string()), active);
    }

    if matches_any(line, &MATERIAL_MARKERS) {
        return (LineClass::MaterialNote(line.to_string()), active);
    }

    match active {
        Some(technician) => {
            let class = LineClass::Continuation {
                technician: technician.clone(),
                task: line.to_string(),
            };
            (class, Some(technician))
        }
        None => (LineClass::Dropped, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_subject_requires_capitalized_word_then_whitespace() {
        assert_eq!(leading_subject("Alice replaced the seal"), Some("Alice"));
        assert_eq!(leading_subject("Bob\tSuspended"), Some("Bob"));
        assert_eq!(leading_subject("alice replaced the seal"), None);
        assert_eq!(leading_subject("ALICE replaced the seal"), None);
        assert_eq!(leading_subject("Alice"), None, "no trailing whitespace");
        assert_eq!(leading_subject("A team visit"), None, "single letter");
        assert_eq!(leading_subject("Al1ce fixed it"), None);
        assert_eq!(leading_subject(""), None);
    }

    #[test]
    fn name_line_extracts_task_remainder() {
        let (class, active) = classify("Alice Replaced pump seal", None);
        assert_eq!(
            class,
            LineClass::Technician {
                name: "Alice".to_string(),
                disposition: Disposition::Task("Replaced pump seal".to_string()),
            }
        );
        assert_eq!(active.as_deref(), Some("Alice"));
    }

    #[test]
    fn name_line_with_only_name_and_whitespace_records_empty_task() {
        let (class, _) = classify("Alice ", None);
        assert_eq!(
            class,
            LineClass::Technician {
                name: "Alice".to_string(),
                disposition: Disposition::Task(String::new()),
            }
        );
    }

    #[test]
    fn disposition_markers_apply_in_fixed_order() {
        let (class, _) = classify("Bob Suspended pending PTO review", None);
        assert_eq!(
            class,
            LineClass::Technician {
                name: "Bob".to_string(),
                disposition: Disposition::Suspended,
            }
        );

        let (class, _) = classify("Dana PTO until Friday", None);
        assert_eq!(
            class,
            LineClass::Technician {
                name: "Dana".to_string(),
                disposition: Disposition::OnLeave,
            }
        );

        let (class, _) = classify("Carl Completed forklift TRAINING", None);
        assert_eq!(
            class,
            LineClass::Technician {
                name: "Carl".to_string(),
                disposition: Disposition::Training,
            }
        );

        let (class, _) = classify("Carl Passed his tests", None);
        assert_eq!(
            class,
            LineClass::Technician {
                name: "Carl".to_string(),
                disposition: Disposition::Training,
            }
        );
    }

    #[test]
    fn suspended_and_pto_markers_are_case_sensitive() {
        let (class, _) = classify("Bob suspended the lift work", None);
        assert_eq!(
            class,
            LineClass::Technician {
                name: "Bob".to_string(),
                disposition: Disposition::Task("suspended the lift work".to_string()),
            }
        );
    }

    #[test]
    fn name_match_outranks_contractor_and_material_keywords() {
        let (class, active) = classify("Evan ordered material for SSI job", None);
        assert_eq!(
            class,
            LineClass::Technician {
                name: "Evan".to_string(),
                disposition: Disposition::Task("ordered material for SSI job".to_string()),
            }
        );
        assert_eq!(active.as_deref(), Some("Evan"));
    }

    #[test]
    fn contractor_markers_match_before_material_markers() {
        let line = "SSI needs material onsite tomorrow";
        let (class, _) = classify(line, None);
        assert_eq!(class, LineClass::ContractorNote(line.to_string()));
    }

    #[test]
    fn contractor_marker_is_case_insensitive_only_for_contractor_keyword() {
        let (class, _) = classify("waiting on the Contractor crew", None);
        assert_eq!(
            class,
            LineClass::ContractorNote("waiting on the Contractor crew".to_string())
        );

        // "ssi" lowercased must not trigger the case-sensitive acronym.
        let (class, _) = classify("ssi follow-up pending", Some("Alice".to_string()));
        assert_eq!(
            class,
            LineClass::Continuation {
                technician: "Alice".to_string(),
                task: "ssi follow-up pending".to_string(),
            }
        );
    }

    #[test]
    fn material_lines_are_captured_whole() {
        let line = "need two more gaskets";
        let (class, active) = classify(line, Some("Alice".to_string()));
        assert_eq!(class, LineClass::MaterialNote(line.to_string()));
        assert_eq!(active.as_deref(), Some("Alice"), "subject unchanged");
    }

    // "Need" at the start of a line fits the capitalized-name shape, so the
    // line reads as a technician called Need, not as a material request.
    // The material marker only applies when no name shape leads the line.
    #[test]
    fn leading_material_keyword_in_name_shape_is_a_technician_line() {
        let (class, active) = classify("Need more gaskets", None);
        assert_eq!(
            class,
            LineClass::Technician {
                name: "Need".to_string(),
                disposition: Disposition::Task("more gaskets".to_string()),
            }
        );
        assert_eq!(active.as_deref(), Some("Need"));
    }

    #[test]
    fn unlabeled_line_attaches_to_active_subject() {
        let (class, active) = classify("ran diagnostics", Some("Carl".to_string()));
        assert_eq!(
            class,
            LineClass::Continuation {
                technician: "Carl".to_string(),
                task: "ran diagnostics".to_string(),
            }
        );
        assert_eq!(active.as_deref(), Some("Carl"));
    }

    #[test]
    fn unlabeled_line_without_subject_is_dropped() {
        let (class, active) = classify("checked valve", None);
        assert_eq!(class, LineClass::Dropped);
        assert_eq!(active, None);
    }
}
