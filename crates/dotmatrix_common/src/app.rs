use crate::key::Key;

/// Contract between an emulator core and a frontend.
///
/// The frontend owns the window and event loop; the core implements this
/// trait to receive per-frame updates and key events. `update` fills the
/// provided RGB24 screen buffer with one finished frame.
pub trait App {
    fn init(&mut self);
    fn update(&mut self, screen: &mut [u8]);
    fn handle_key_event(&mut self, key: Key, is_down: bool);
    fn should_exit(&self) -> bool;
    fn exit(&mut self);

    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn scale(&self) -> u32;
    fn title(&self) -> String;
}
