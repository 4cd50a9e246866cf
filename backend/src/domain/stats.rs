//! Aggregate statistics over the case collection.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{Case, CaseId, CaseType, UserId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct Overview {
    pub total_cases: u64,
    pub open_cases: u64,
    pub closed_cases: u64,
    pub unassigned_cases: u64,
    pub cases_by_type: BTreeMap<String, u64>,
    pub cases_by_status: BTreeMap<String, u64>,
}

pub fn overview(cases: &[Case]) -> Overview {
    let mut out = Overview::default();
    for case in cases {
        out.total_cases += 1;
        if case.status.is_closed() {
            out.closed_cases += 1;
        } else {
            out.open_cases += 1;
        }
        if case.is_unassigned() {
            out.unassigned_cases += 1;
        }
        *out.cases_by_type.entry(case.case_type.as_str().to_owned()).or_default() += 1;
        *out.cases_by_status.entry(case.status.as_str().to_owned()).or_default() += 1;
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OfficerWorkload {
    pub officer_id: UserId,
    pub officer_name: Option<String>,
    pub total: u64,
    pub open: u64,
    pub closed: u64,
}

/// Per-assignee counts, busiest first.
pub fn officer_workload(cases: &[Case]) -> Vec<OfficerWorkload> {
    let mut by_officer: BTreeMap<UserId, OfficerWorkload> = BTreeMap::new();
    for case in cases {
        let Some(officer_id) = case.assigned_to else {
            continue;
        };
        let entry = by_officer.entry(officer_id).or_insert_with(|| OfficerWorkload {
            officer_id,
            officer_name: None,
            total: 0,
            open: 0,
            closed: 0,
        });
        if entry.officer_name.is_none() {
            entry.officer_name.clone_from(&case.assigned_to_name);
        }
        entry.total += 1;
        if case.status.is_closed() {
            entry.closed += 1;
        } else {
            entry.open += 1;
        }
    }
    let mut rows: Vec<_> = by_officer.into_values().collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct FpnTypeBreakdown {
    pub issued: u64,
    pub paid: u64,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct FpnSummary {
    pub total_issued: u64,
    pub total_paid: u64,
    pub total_outstanding: u64,
    pub total_amount: f64,
    pub amount_paid: f64,
    pub amount_outstanding: f64,
    pub by_case_type: BTreeMap<String, FpnTypeBreakdown>,
}

pub fn fpn_summary(cases: &[Case]) -> FpnSummary {
    let mut out = FpnSummary::default();
    for case in cases.iter().filter(|case| case.fpn_issued) {
        let (paid, amount) = case
            .fpn_details
            .as_ref()
            .map_or((false, 0.0), |d| (d.paid, d.fpn_amount.unwrap_or(0.0)));
        out.total_issued += 1;
        out.total_amount += amount;
        if paid {
            out.total_paid += 1;
            out.amount_paid += amount;
        } else {
            out.total_outstanding += 1;
            out.amount_outstanding += amount;
        }
        let row = out
            .by_case_type
            .entry(case.case_type.as_str().to_owned())
            .or_default();
        row.issued += 1;
        row.amount += amount;
        if paid {
            row.paid += 1;
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OutstandingFpn {
    pub case_id: CaseId,
    pub reference_number: String,
    pub case_type: CaseType,
    pub fpn_ref: Option<String>,
    pub fpn_amount: Option<f64>,
    pub date_issued: Option<NaiveDate>,
    pub days_outstanding: i64,
    pub assigned_to_name: Option<String>,
}

/// Unpaid FPNs, oldest first. Cases without an issue date count from creation.
pub fn outstanding_fpns(cases: &[Case], now: DateTime<Utc>) -> Vec<OutstandingFpn> {
    let today = now.date_naive();
    let mut rows: Vec<_> = cases
        .iter()
        .filter(|case| case.fpn_issued)
        .filter_map(|case| {
            let details = case.fpn_details.as_ref()?;
            if details.paid {
                return None;
            }
            let issued = details.date_issued.unwrap_or_else(|| case.created_at.date_naive());
            Some(OutstandingFpn {
                case_id: case.id,
                reference_number: case.reference_number.clone(),
                case_type: case.case_type,
                fpn_ref: details.fpn_ref.clone(),
                fpn_amount: details.fpn_amount,
                date_issued: details.date_issued,
                days_outstanding: (today - issued).num_days().max(0),
                assigned_to_name: case.assigned_to_name.clone(),
            })
        })
        .collect();
    rows.sort_by(|a, b| b.days_outstanding.cmp(&a.days_outstanding));
    rows
}
