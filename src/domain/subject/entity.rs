// src/domain/subject/entity.rs

use uuid::Uuid;

use crate::{domain::lifecycle::Tracked, utils::random::new_id};

#[derive(Debug, Clone)]
pub struct Subject {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl Subject {
    pub fn new(user_id: Uuid, name: String, description: Option<String>) -> Tracked<Subject> {
        Tracked::created(Subject {
            id: new_id(),
            user_id,
            name,
            description,
        })
    }
}

impl Tracked<Subject> {
    pub fn rename(&mut self, name: String, description: Option<String>) {
        self.update(|s| {
            s.name = name;
            s.description = description;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_loaded_subject_marks_updated() {
        let mut subject = Tracked::loaded(
            Subject::new(Uuid::new_v4(), "Mathematics".to_string(), None).into_inner(),
        );
        subject.rename("Algebra".to_string(), Some("Equations".to_string()));
        assert!(subject.is_updated());
        assert_eq!(subject.name, "Algebra");
        assert_eq!(subject.description.as_deref(), Some("Equations"));
    }
}
