// In-memory employee table

use async_trait::async_trait;

use super::{DirectoryError, Employee, EmployeeDirectory};

/// Fixed in-memory directory
///
/// Lookups are a linear scan; when several rows share a name the first one
/// wins.
#[derive(Debug, Clone, Default)]
pub struct MockDirectory {
    employees: Vec<Employee>,
}

impl MockDirectory {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self { employees }
    }

    /// The built-in three-person table used when nothing else is configured
    pub fn sample() -> Self {
        Self::new(vec![
            Employee::new(1, "김철수", "개발팀", "시니어 개발자"),
            Employee::new(2, "이영희", "디자인팀", "UX 디자이너"),
            Employee::new(3, "박민수", "마케팅팀", "마케팅 매니저"),
        ])
    }

    /// Synchronous exact-match scan
    pub fn find(&self, name: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}

#[async_trait]
impl EmployeeDirectory for MockDirectory {
    async fn find_by_name(&self, name: &str) -> Result<Option<Employee>, DirectoryError> {
        Ok(self.find(name).cloned())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_has_three_rows() {
        let dir = MockDirectory::sample();
        assert_eq!(dir.len(), 3);
        assert_eq!(dir.find("이영희").unwrap().department, "디자인팀");
    }

    #[test]
    fn test_match_is_exact() {
        let dir = MockDirectory::new(vec![Employee::new(1, "Ana", "Ops", "Lead")]);
        assert!(dir.find("Ana").is_some());
        assert!(dir.find("ana").is_none());
        assert!(dir.find("Ana ").is_none());
        assert!(dir.find("Ána").is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let dir = MockDirectory::new(vec![
            Employee::new(7, "Kim", "Dev", "Engineer"),
            Employee::new(8, "Kim", "Sales", "Manager"),
        ]);
        assert_eq!(dir.find("Kim").unwrap().id, 7);
    }

    #[tokio::test]
    async fn test_find_by_name_missing() {
        let dir = MockDirectory::sample();
        let found = dir.find_by_name("홍길동").await.unwrap();
        assert!(found.is_none());
    }
}
