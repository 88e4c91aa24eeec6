/// Reports whether the runtime believes the network is reachable.
///
/// Consulted once, before the lookup is spawned; an offline verdict
/// short-circuits straight to a fallback record without issuing any
/// request.
pub trait Connectivity {
    fn is_online(&self) -> bool;
}

/// Default probe backed by the `TELLURION_OFFLINE` environment variable.
///
/// Without a kernel-level reachability signal the probe stays optimistic
/// and reports online, the same stance a browser's `navigator.onLine`
/// takes. Setting `TELLURION_OFFLINE=1` forces the offline path.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConnectivity;

impl Connectivity for EnvConnectivity {
    fn is_online(&self) -> bool {
        !matches!(
            std::env::var("TELLURION_OFFLINE").ok().as_deref(),
            Some("1") | Some("true")
        )
    }
}
