// Audio routing - USB device discovery and the bit-perfect mixer override

pub mod device;
pub mod negotiator;

pub use device::{
    AudioDevice, AudioSubsystem, AudioUsage, DeviceKind, MixerBehavior, MixerFormat, MixerMode,
    SampleEncoding,
};
pub use negotiator::{select_mixer_mode, AudioRoute, AudioRouteNegotiator, InactiveReason, Negotiation};
