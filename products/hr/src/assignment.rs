use crate::model::EmployeeId;

/// Hook invoked by `assign_to_project`. Project staffing lives outside the
/// roster, so implementations own whatever state they need.
pub trait ProjectAssigner: Send + Sync {
    fn assign(&self, employee_id: EmployeeId);
}

/// Records the request and nothing else.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogOnlyAssigner;

impl ProjectAssigner for LogOnlyAssigner {
    fn assign(&self, employee_id: EmployeeId) {
        tracing::info!(employee_id, "employee assigned to project");
    }
}
