use crate::HealthRes;

/// Liveness check shared by the gateway binaries.
///
/// Reports liveness only; it does not call the upstream diagnose endpoint.
pub struct HealthService;

impl HealthService {
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "rackdiag is alive".into(),
        }
    }
}
