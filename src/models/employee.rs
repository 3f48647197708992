use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Employee {
    pub id: i64,
    pub account_id: i64,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: Option<String>,
    pub role: String,
    pub status: String,
    pub salary: Option<Decimal>,
    pub hire_date: Option<NaiveDate>,
    pub full_time: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Department label for grouping; missing and blank both count as unassigned.
    pub fn department_label(&self) -> &str {
        match self.department.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => "Unassigned",
        }
    }

    pub fn status_label(&self) -> &str {
        if self.status.is_empty() {
            "Unknown"
        } else {
            &self.status
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Employee {
        Employee {
            id: 1,
            account_id: 1,
            employee_id: "EMP-0001".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            department: None,
            role: "Engineer".to_string(),
            status: "active".to_string(),
            salary: None,
            hire_date: None,
            full_time: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn full_name_joins_first_and_last() {
        assert_eq!(sample().full_name(), "Jane Doe");
    }

    #[test]
    fn missing_department_is_unassigned() {
        let mut employee = sample();
        assert_eq!(employee.department_label(), "Unassigned");
        employee.department = Some(String::new());
        assert_eq!(employee.department_label(), "Unassigned");
        employee.department = Some("Engineering".to_string());
        assert_eq!(employee.department_label(), "Engineering");
    }

    #[test]
    fn blank_status_is_unknown() {
        let mut employee = sample();
        assert_eq!(employee.status_label(), "active");
        employee.status = String::new();
        assert_eq!(employee.status_label(), "Unknown");
    }
}
