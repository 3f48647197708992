//! Dashboard aggregates, computed in memory over the full employee
//! collection. The dataset is assumed small; every dashboard request
//! reloads and re-reduces it.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::models::employee::Employee;

pub const TOP_DEPARTMENTS: usize = 6;

/// Parallel label/value series for the dashboard charts.
#[derive(Serialize, Debug, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Serialize, Debug, Default, PartialEq)]
pub struct CountSeries {
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

#[derive(Serialize, Debug, Default)]
pub struct DashboardMetrics {
    pub total_employees: usize,
    pub full_time_count: usize,
    pub department_count: usize,
    pub average_salary: f64,
    pub average_tenure: f64,
    pub department_salary_chart: ChartSeries,
    pub department_tenure_chart: ChartSeries,
    pub department_chart: CountSeries,
    pub status_chart: CountSeries,
}

#[derive(Default)]
struct DepartmentAccumulator {
    count: usize,
    salary_total: f64,
    tenure_total: f64,
}

/// Salary is stored as a decimal; averaging converts to f64 for display
/// only, accepting the precision loss.
fn salary_f64(employee: &Employee) -> Option<f64> {
    employee.salary.as_ref().and_then(|s| s.to_f64())
}

/// Years since hire using 365.25-day years, floored at zero so future
/// hire dates do not produce negative tenure.
fn tenure_years(hire_date: NaiveDate, today: NaiveDate) -> f64 {
    let days = (today - hire_date).num_days() as f64;
    (days / 365.25).max(0.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn compute(employees: &[Employee], today: NaiveDate) -> DashboardMetrics {
    let total_employees = employees.len();
    let full_time_count = employees.iter().filter(|e| e.full_time).count();
    let department_count = employees
        .iter()
        .filter_map(|e| e.department.as_deref())
        .filter(|d| !d.is_empty())
        .collect::<std::collections::HashSet<_>>()
        .len();

    let salaries: Vec<f64> = employees.iter().filter_map(salary_f64).collect();
    let tenures: Vec<f64> = employees
        .iter()
        .filter_map(|e| e.hire_date)
        .map(|hired| tenure_years(hired, today))
        .collect();

    let average_salary = if salaries.is_empty() {
        0.0
    } else {
        round2(salaries.iter().sum::<f64>() / salaries.len() as f64)
    };
    let average_tenure = if tenures.is_empty() {
        0.0
    } else {
        round1(tenures.iter().sum::<f64>() / tenures.len() as f64)
    };

    let mut per_department: HashMap<&str, DepartmentAccumulator> = HashMap::new();
    for employee in employees {
        let stats = per_department.entry(employee.department_label()).or_default();
        stats.count += 1;
        if let Some(salary) = salary_f64(employee) {
            stats.salary_total += salary;
        }
        if let Some(hired) = employee.hire_date {
            stats.tenure_total += tenure_years(hired, today);
        }
    }

    // Count descending, then label ascending: ties must resolve the same
    // way on every request.
    let mut ranked: Vec<(&str, DepartmentAccumulator)> = per_department.into_iter().collect();
    ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_DEPARTMENTS);

    let mut department_salary_chart = ChartSeries::default();
    let mut department_tenure_chart = ChartSeries::default();
    for (label, stats) in &ranked {
        department_salary_chart.labels.push((*label).to_string());
        department_salary_chart
            .values
            .push(round2(stats.salary_total / stats.count as f64));
        department_tenure_chart.labels.push((*label).to_string());
        department_tenure_chart
            .values
            .push(round1(stats.tenure_total / stats.count as f64));
    }

    DashboardMetrics {
        total_employees,
        full_time_count,
        department_count,
        average_salary,
        average_tenure,
        department_salary_chart,
        department_tenure_chart,
        department_chart: grouped_counts(employees, |e| e.department_label()),
        status_chart: grouped_counts(employees, |e| e.status_label()),
    }
}

/// Histogram over the full collection, ordered by group key. Groups only
/// exist for keys that occur, so no zero-count bucket is ever emitted.
fn grouped_counts<'a, F>(employees: &'a [Employee], key: F) -> CountSeries
where
    F: Fn(&'a Employee) -> &'a str,
{
    let mut groups: BTreeMap<&str, i64> = BTreeMap::new();
    for employee in employees {
        *groups.entry(key(employee)).or_insert(0) += 1;
    }
    let mut series = CountSeries::default();
    for (label, count) in groups {
        series.labels.push(label.to_string());
        series.values.push(count);
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn employee(
        id: i64,
        department: Option<&str>,
        status: &str,
        salary: Option<i64>,
        hire_date: Option<&str>,
        full_time: bool,
    ) -> Employee {
        Employee {
            id,
            account_id: id,
            employee_id: format!("EMP-{:04}", id),
            first_name: "Test".to_string(),
            last_name: format!("Person{}", id),
            email: format!("person{}@example.com", id),
            department: department.map(str::to_string),
            role: "Analyst".to_string(),
            status: status.to_string(),
            salary: salary.map(Decimal::from),
            hire_date: hire_date.map(|d| d.parse().unwrap()),
            full_time,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        "2026-01-01".parse().unwrap()
    }

    #[test]
    fn empty_collection_yields_zero_aggregates() {
        let metrics = compute(&[], today());
        assert_eq!(metrics.total_employees, 0);
        assert_eq!(metrics.full_time_count, 0);
        assert_eq!(metrics.department_count, 0);
        assert_eq!(metrics.average_salary, 0.0);
        assert_eq!(metrics.average_tenure, 0.0);
        assert!(metrics.department_chart.labels.is_empty());
        assert!(metrics.status_chart.labels.is_empty());
    }

    #[test]
    fn average_salary_skips_null_salaries() {
        let employees = vec![
            employee(1, Some("Engineering"), "active", Some(50_000), None, true),
            employee(2, Some("Engineering"), "active", None, None, true),
            employee(3, Some("Sales"), "active", Some(70_000), None, false),
        ];
        let metrics = compute(&employees, today());
        assert_eq!(metrics.average_salary, 60_000.00);
        assert_eq!(metrics.full_time_count, 2);
        assert_eq!(metrics.department_count, 2);
    }

    #[test]
    fn averages_are_order_independent() {
        let mut employees = vec![
            employee(1, Some("Engineering"), "active", Some(48_000), Some("2020-03-01"), true),
            employee(2, Some("Sales"), "active", Some(55_500), Some("2018-07-15"), true),
            employee(3, None, "inactive", Some(61_250), None, false),
            employee(4, Some("Engineering"), "active", None, Some("2024-11-30"), true),
        ];
        let forward = compute(&employees, today());
        employees.reverse();
        let backward = compute(&employees, today());
        assert_eq!(forward.average_salary, backward.average_salary);
        assert_eq!(forward.average_tenure, backward.average_tenure);
        assert_eq!(forward.department_chart, backward.department_chart);
        assert_eq!(forward.department_salary_chart, backward.department_salary_chart);
    }

    #[test]
    fn future_hire_dates_floor_tenure_at_zero() {
        let employees = vec![employee(1, None, "active", None, Some("2030-01-01"), true)];
        let metrics = compute(&employees, today());
        assert_eq!(metrics.average_tenure, 0.0);
    }

    #[test]
    fn tenure_uses_fractional_years() {
        // 2 years plus half a 365.25-day year, rounded to 1dp.
        let employees = vec![
            employee(1, None, "active", None, Some("2024-01-01"), true),
            employee(2, None, "active", None, Some("2023-01-01"), true),
        ];
        let metrics = compute(&employees, today());
        assert_eq!(metrics.average_tenure, 2.5);
    }

    #[test]
    fn department_buckets_partition_the_collection() {
        let employees = vec![
            employee(1, Some("Engineering"), "active", None, None, true),
            employee(2, Some("Engineering"), "active", None, None, true),
            employee(3, Some("Engineering"), "active", None, None, true),
            employee(4, Some("Engineering"), "active", None, None, true),
            employee(5, Some("Engineering"), "active", None, None, true),
            employee(6, None, "active", None, None, true),
            employee(7, Some(""), "active", None, None, true),
        ];
        let metrics = compute(&employees, today());
        assert_eq!(metrics.department_chart.labels, vec!["Engineering", "Unassigned"]);
        assert_eq!(metrics.department_chart.values, vec![5, 2]);
        let counted: i64 = metrics.department_chart.values.iter().sum();
        assert_eq!(counted as usize, metrics.total_employees);
    }

    #[test]
    fn top_departments_capped_at_six_with_stable_ties() {
        let mut employees = Vec::new();
        // Seven departments, one employee each: ties break alphabetically.
        for (i, dept) in ["Gamma", "Beta", "Alpha", "Epsilon", "Delta", "Zeta", "Eta"]
            .iter()
            .enumerate()
        {
            employees.push(employee(i as i64 + 1, Some(dept), "active", Some(40_000), None, true));
        }
        let metrics = compute(&employees, today());
        assert_eq!(
            metrics.department_salary_chart.labels,
            vec!["Alpha", "Beta", "Delta", "Epsilon", "Eta", "Gamma"]
        );
        assert_eq!(
            metrics.department_salary_chart.labels,
            metrics.department_tenure_chart.labels
        );
    }

    #[test]
    fn per_department_series_average_over_headcount() {
        // Salary total divides by department headcount, including members
        // with no recorded salary.
        let employees = vec![
            employee(1, Some("Sales"), "active", Some(60_000), Some("2024-01-01"), true),
            employee(2, Some("Sales"), "active", None, None, true),
        ];
        let metrics = compute(&employees, today());
        assert_eq!(metrics.department_salary_chart.labels, vec!["Sales"]);
        assert_eq!(metrics.department_salary_chart.values, vec![30_000.00]);
        assert_eq!(metrics.department_tenure_chart.values, vec![1.0]);
    }

    #[test]
    fn status_histogram_orders_by_key_and_labels_unknown() {
        let employees = vec![
            employee(1, None, "inactive", None, None, true),
            employee(2, None, "active", None, None, true),
            employee(3, None, "", None, None, true),
            employee(4, None, "active", None, None, true),
        ];
        let metrics = compute(&employees, today());
        assert_eq!(metrics.status_chart.labels, vec!["Unknown", "active", "inactive"]);
        assert_eq!(metrics.status_chart.values, vec![1, 2, 1]);
    }

    #[test]
    fn average_salary_rounds_to_two_decimals() {
        let employees = vec![
            employee(1, None, "active", Some(50_000), None, true),
            employee(2, None, "active", Some(50_001), None, true),
            employee(3, None, "active", Some(50_001), None, true),
        ];
        let metrics = compute(&employees, today());
        assert_eq!(metrics.average_salary, 50_000.67);
    }
}
