#[cfg(target_os = "android")]
pub mod android;

#[cfg_attr(not(target_os = "android"), allow(dead_code))]
mod slot;
