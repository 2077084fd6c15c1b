pub mod ntp;
pub mod traceroute;
