use crate::model::student::Student;

/// Call-scoped view of a class roster. Built fresh for every reconciliation
/// pass from the store's answer; never held across requests, so membership
/// changes are picked up on the next call. Deduplicates by student id so a
/// student can never be counted twice.
pub struct RosterIndex {
    students: Vec<Student>,
}

impl RosterIndex {
    pub fn new(roster: Vec<Student>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let students = roster
            .into_iter()
            .filter(|s| seen.insert(s.id))
            .collect();
        Self { students }
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn ids(&self) -> Vec<u64> {
        self.students.iter().map(|s| s.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn siswa(id: u64) -> Student {
        Student {
            id,
            kelas_id: 1,
            nama: format!("Siswa {id}"),
            rfid_tag: None,
        }
    }

    #[test]
    fn duplicate_roster_rows_collapse() {
        let index = RosterIndex::new(vec![siswa(1), siswa(2), siswa(1)]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.ids(), vec![1, 2]);
    }
}
