use anyhow::Result;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use typed_builder::TypedBuilder;

use dotmatrix_common::{App, Key};
pub use sdl2;

/// Frame period for the DMG LCD (59.73 Hz), used to pace the main loop when
/// vsync alone runs faster than the emulated machine.
const FRAME_PERIOD: std::time::Duration = std::time::Duration::from_nanos(16_742_706);

#[derive(TypedBuilder)]
pub struct SdlInitInfo {
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub title: String,
}

pub struct SdlContext;

impl SdlContext {
    /// Run `app` inside an SDL window until it asks to exit or the window
    /// is closed.
    ///
    /// The app's `update` is called once per frame with an RGB24 buffer of
    /// `width * height` pixels which is then blitted to the window texture.
    pub fn run(init: SdlInitInfo, mut app: impl App) -> Result<()> {
        let SdlInitInfo {
            width,
            height,
            scale,
            title,
        } = init;

        let sdl_context = sdl2::init().map_err(anyhow::Error::msg)?;
        let video_subsystem = sdl_context.video().map_err(anyhow::Error::msg)?;
        let window = video_subsystem
            .window(&title, width * scale, height * scale)
            .position_centered()
            .build()?;
        let mut canvas = window.into_canvas().present_vsync().build()?;
        canvas
            .set_scale(scale as f32, scale as f32)
            .map_err(anyhow::Error::msg)?;
        let creator = canvas.texture_creator();
        let mut texture = creator.create_texture_target(PixelFormatEnum::RGB24, width, height)?;

        let mut event_pump = sdl_context.event_pump().map_err(anyhow::Error::msg)?;
        let mut screen_state = vec![0u8; (width * height * 3) as usize];
        log::info!("sdl: window {}x{} scale {scale}", width * scale, height * scale);

        app.init();
        loop {
            if app.should_exit() {
                app.exit();
                break;
            }

            let frame_start = std::time::Instant::now();

            while let Some(event) = event_pump.poll_event() {
                match event {
                    Event::Quit { .. } => {
                        app.exit();
                        return Ok(());
                    }
                    Event::KeyDown {
                        keycode: Some(keycode),
                        ..
                    } => app.handle_key_event(map_keycode(keycode), true),
                    Event::KeyUp {
                        keycode: Some(keycode),
                        ..
                    } => app.handle_key_event(map_keycode(keycode), false),
                    _ => {}
                }
            }

            app.update(&mut screen_state);

            texture
                .update(None, &screen_state, (width * 3) as usize)
                .map_err(anyhow::Error::msg)?;
            canvas
                .copy(&texture, None, None)
                .map_err(anyhow::Error::msg)?;
            canvas.present();

            let elapsed = frame_start.elapsed();
            if elapsed < FRAME_PERIOD {
                std::thread::sleep(FRAME_PERIOD - elapsed);
            }
        }

        Ok(())
    }
}

pub fn map_keycode(keycode: Keycode) -> Key {
    match keycode {
        Keycode::Up => Key::Up,
        Keycode::Down => Key::Down,
        Keycode::Left => Key::Left,
        Keycode::Right => Key::Right,
        Keycode::Return => Key::Return,
        Keycode::Space => Key::Space,
        Keycode::A => Key::A,
        Keycode::S => Key::S,
        Keycode::Z => Key::Z,
        Keycode::X => Key::X,
        _ => Key::None,
    }
}
