use eframe::egui::Context;

pub(in crate::app) trait FrameClock {
    fn request_frame(&self);
}

pub(in crate::app) struct EguiFrameClock<'a> {
    ctx: &'a Context,
}

impl<'a> EguiFrameClock<'a> {
    pub(in crate::app) fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }
}

impl FrameClock for EguiFrameClock<'_> {
    fn request_frame(&self) {
        self.ctx.request_repaint();
    }
}

#[cfg(test)]
#[derive(Default)]
pub(in crate::app) struct ManualFrameClock {
    requested: std::cell::Cell<usize>,
}

#[cfg(test)]
impl ManualFrameClock {
    pub(in crate::app) fn requested(&self) -> usize {
        self.requested.get()
    }
}

#[cfg(test)]
impl FrameClock for ManualFrameClock {
    fn request_frame(&self) {
        self.requested.set(self.requested.get() + 1);
    }
}
