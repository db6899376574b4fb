use crate::model::Task;

/// All / Active / Completed view selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.done,
            Self::Completed => task.done,
        }
    }
}

/// Derives the display view of the collection: status predicate AND
/// case-insensitive substring search on the task text. Any non-empty
/// search string is matched literally, whitespace included. Keeps the
/// original order and never touches the collection itself.
pub fn visible_tasks(tasks: &[Task], filter: StatusFilter, search: &str) -> Vec<Task> {
    let needle = search.to_lowercase();
    tasks
        .iter()
        .filter(|task| filter.matches(task))
        .filter(|task| needle.is_empty() || task.text.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
