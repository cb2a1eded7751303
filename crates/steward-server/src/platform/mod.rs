#[cfg(target_os = "linux")]
pub mod linux;
#[cfg(windows)]
pub mod windows;

use steward_core::ControlFacilityBridge;

/// Layers the platform's readiness notifications over `bridge`, if the
/// platform has any.
pub(crate) fn notify_bridge<B: ControlFacilityBridge>(bridge: B) -> impl ControlFacilityBridge {
    #[cfg(target_os = "linux")]
    {
        linux::NotifyBridge::new(bridge)
    }
    #[cfg(not(target_os = "linux"))]
    {
        bridge
    }
}
