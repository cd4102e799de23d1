mod controls;
mod overlay;
mod panels;

pub(in crate::app) use overlay::OverlayStats;
