use crate::canvas::{load_font, Canvas};
use crate::config::GaugeConfig;
use crate::frame::{self, FrameClock};
use crate::session::{InputSession, Key};
use crate::GaugeCommand;
use anyhow::{anyhow, Result};
use pixels::{Pixels, SurfaceTexture};
use std::sync::mpsc::Receiver;
use std::time::Instant;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key as LogicalKey, NamedKey};
use winit::window::WindowBuilder;

/// Own the window until it is closed, redrawing at `config.max_framerate`.
pub(crate) fn run(
    config: &GaugeConfig,
    initial: InputSession,
    receiver: Option<Receiver<GaugeCommand>>,
) -> Result<()> {
    let font = load_font(config.font_path.as_deref())?;
    let (buffer_width, buffer_height) = (config.window_width as u32, config.window_height as u32);

    let event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let window = WindowBuilder::new()
        .with_title(&config.title)
        .with_inner_size(LogicalSize::new(
            config.window_width as f64,
            config.window_height as f64,
        ))
        .with_resizable(false)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = std::sync::Arc::new(window);
    let window_clone = window.clone();

    let size = window.inner_size();
    let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
    let mut pixels = Pixels::new(buffer_width, buffer_height, surface_texture)
        .map_err(|err| anyhow!("failed to create pixel surface: {err}"))?;

    let mut active = config.clone();
    let mut session = initial;
    let mut pending: Vec<Key> = Vec::new();
    let mut clock = FrameClock::new(config.max_framerate);
    tracing::info!(
        style = ?active.style,
        fps = active.max_framerate,
        "window opened"
    );

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    tracing::info!("close requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                        tracing::error!(%err, "failed to resize surface");
                        window_target.exit();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                    pending.extend(decode_key(&event.logical_key, event.text.as_deref()));
                }
                WindowEvent::RedrawRequested => {
                    if let Some(ref receiver) = receiver {
                        while let Ok(command) = receiver.try_recv() {
                            frame::apply_command(&mut session, &mut active, command);
                        }
                    }
                    let (next, draw_list) =
                        frame::step(std::mem::take(&mut session), pending.drain(..), &active);
                    session = next;

                    let mut canvas =
                        Canvas::new(pixels.frame_mut(), active.window_width, active.window_height);
                    canvas.clear(active.background_color);
                    canvas.render(&draw_list, font.as_ref());
                    if let Err(err) = pixels.render() {
                        tracing::error!(%err, "failed to present frame");
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                let now = Instant::now();
                if clock.tick(now) {
                    window_clone.request_redraw();
                }
                window_target.set_control_flow(ControlFlow::WaitUntil(clock.next_deadline(now)));
            }
            _ => {}
        })
        .map_err(|err| anyhow!("event loop failed: {err}"))?;

    tracing::info!("window closed");
    Ok(())
}

/// Translate a pressed key into session keys.
fn decode_key(logical: &LogicalKey, text: Option<&str>) -> Vec<Key> {
    match logical {
        LogicalKey::Named(NamedKey::Enter) => vec![Key::Enter],
        LogicalKey::Named(NamedKey::Backspace) => vec![Key::Backspace],
        LogicalKey::Named(NamedKey::Escape) => vec![Key::Escape],
        _ => text
            .map(|text| {
                text.chars()
                    .filter(|ch| !ch.is_control())
                    .map(Key::Char)
                    .collect()
            })
            .unwrap_or_default(),
    }
}
