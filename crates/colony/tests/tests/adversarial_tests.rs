#[path = "adversarial/direct_repoint.rs"]
mod direct_repoint;

#[path = "adversarial/lifecycle_bypass.rs"]
mod lifecycle_bypass;

#[path = "adversarial/recovery_abuse.rs"]
mod recovery_abuse;
