// src/domain/grade/entity.rs

use uuid::Uuid;

use crate::{domain::lifecycle::Tracked, utils::random::new_id};

#[derive(Debug, Clone)]
pub struct Grade {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl Grade {
    pub fn new(user_id: Uuid, name: String, description: Option<String>) -> Tracked<Grade> {
        Tracked::created(Grade {
            id: new_id(),
            user_id,
            name,
            description,
        })
    }
}

impl Tracked<Grade> {
    pub fn rename(&mut self, name: String, description: Option<String>) {
        self.update(|g| {
            g.name = name;
            g.description = description;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_loaded_grade_marks_updated() {
        let mut grade = Tracked::loaded(
            Grade::new(Uuid::new_v4(), "Grade 7".to_string(), None).into_inner(),
        );
        grade.rename("Grade 8".to_string(), Some("Junior high".to_string()));
        assert!(grade.is_updated());
        assert_eq!(grade.name, "Grade 8");
        assert_eq!(grade.description.as_deref(), Some("Junior high"));
    }
}
