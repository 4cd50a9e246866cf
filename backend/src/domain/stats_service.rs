//! Dashboard statistics. Workload and FPN reports are restricted to
//! supervisors and managers.

use std::sync::Arc;

use crate::domain::ports::CaseRepository;
use crate::domain::stats::{self, FpnSummary, OfficerWorkload, OutstandingFpn, Overview};
use crate::domain::{AuditEmitter, Case, Error, Resource, User};

#[derive(Clone)]
pub struct StatsService {
    cases: Arc<dyn CaseRepository>,
    emitter: AuditEmitter,
}

impl StatsService {
    pub fn new(cases: Arc<dyn CaseRepository>, emitter: AuditEmitter) -> Self {
        Self { cases, emitter }
    }

    async fn supervisory_cases(&self, actor: &User, report: &str) -> Result<Vec<Case>, Error> {
        self.emitter
            .ensure(
                actor.role.is_supervisory(),
                actor,
                Resource::Collection("stats"),
                report,
                "Insufficient permissions",
            )
            .await?;
        Ok(self.cases.list().await?)
    }

    /// Counts across every case, regardless of team.
    pub async fn overview(&self) -> Result<Overview, Error> {
        let cases = self.cases.list().await?;
        Ok(stats::overview(&cases))
    }

    pub async fn officer_workload(&self, actor: &User) -> Result<Vec<OfficerWorkload>, Error> {
        let cases = self.supervisory_cases(actor, "officer_workload").await?;
        Ok(stats::officer_workload(&cases))
    }

    pub async fn fpn_summary(&self, actor: &User) -> Result<FpnSummary, Error> {
        let cases = self.supervisory_cases(actor, "fpn_summary").await?;
        Ok(stats::fpn_summary(&cases))
    }

    pub async fn outstanding_fpns(&self, actor: &User) -> Result<Vec<OutstandingFpn>, Error> {
        let cases = self.supervisory_cases(actor, "fpn_outstanding").await?;
        Ok(stats::outstanding_fpns(&cases, self.emitter.now()))
    }
}
