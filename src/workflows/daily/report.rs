use super::classifier::{classify, Disposition, LineClass};
use serde::Serialize;

/// One technician's task list, in the order the lines arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnicianActivity {
    pub name: String,
    pub tasks: Vec<String>,
}

/// Derived technician productivity entry; always recomputed from the task
/// lists, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskCount {
    pub technician: String,
    pub count: usize,
}

/// Structured aggregation of one day's update text. Built fresh per
/// invocation; rendering, charting, and persistence consume it downstream.
///
/// `technicians` keeps first-appearance order, and each task list keeps
/// input order. Side lists permit duplicates; a technician may appear in a
/// side list and in `technicians` at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailyReport {
    pub technicians: Vec<TechnicianActivity>,
    pub suspended: Vec<String>,
    pub on_leave: Vec<String>,
    pub in_training: Vec<String>,
    pub contractor_notes: Vec<String>,
    pub material_notes: Vec<String>,
}

impl DailyReport {
    /// Folds raw update text into a report: trim each line, discard blanks,
    /// classify in order while threading the active subject, and route each
    /// outcome into its collection.
    pub fn from_text(input: &str) -> Self {
        Self::from_lines(input.lines())
    }

    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut report = Self::default();
        let mut active: Option<String> = None;

        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (class, next_active) = classify(line, active);
            active = next_active;

            match class {
                LineClass::Technician { name, disposition } => match disposition {
                    Disposition::Suspended => report.suspended.push(name),
                    Disposition::OnLeave => report.on_leave.push(name),
                    Disposition::Training => report.in_training.push(name),
                    Disposition::Task(task) => report.tasks_for(name).push(task),
                },
                LineClass::Continuation { technician, task } => {
                    report.tasks_for(technician).push(task)
                }
                LineClass::ContractorNote(text) => report.contractor_notes.push(text),
                LineClass::MaterialNote(text) => report.material_notes.push(text),
                LineClass::Dropped => {}
            }
        }

        report
    }

    /// Task list for `name`, created on first sight so map order matches
    /// first-appearance order.
    fn tasks_for(&mut self, name: String) -> &mut Vec<String> {
        let index = match self
            .technicians
            .iter()
            .position(|entry| entry.name == name)
        {
            Some(index) => index,
            None => {
                self.technicians.push(TechnicianActivity {
                    name,
                    tasks: Vec::new(),
                });
                self.technicians.len() - 1
            }
        };

        &mut self.technicians[index].tasks
    }

    pub fn task_counts(&self) -> Vec<TaskCount> {
        self.technicians
            .iter()
            .map(|entry| TaskCount {
                technician: entry.name.clone(),
                count: entry.tasks.len(),
            })
            .collect()
    }

    pub fn tasks_of(&self, name: &str) -> Option<&[String]> {
        self.technicians
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.tasks.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.technicians.is_empty()
            && self.suspended.is_empty()
            && self.on_leave.is_empty()
            && self.in_training.is_empty()
            && self.contractor_notes.is_empty()
            && self.material_notes.is_empty()
    }
}
