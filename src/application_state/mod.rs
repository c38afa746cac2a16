//! # Application Shell
//!
//! Drives the editor from winit: builds the window and GPU context once the
//! event loop resumes, forwards window events to the input manager, and runs
//! one editing frame before each redraw.

pub mod graphics_resources_builder;
pub mod input_manager;
pub mod input_state;

use std::sync::Arc;

use graphics_resources_builder::{GraphicsResult, MaybeGraphics};
use input_manager::InputManager;
use log::{error, info};

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{config::EditorConfig, editor_state::EditorState};

/// Top-level winit handler.
///
/// Starts out holding a graphics builder; once the GPU context arrives it
/// holds the running editor instead.
pub struct ApplicationState {
    /// The current graphics state, which may be initializing or ready
    pub graphics: MaybeGraphics,

    /// Present once the editor is running
    pub state: Option<InitializedApplicationState>,

    /// Settings for the editor session
    pub config: EditorConfig,
}

/// The running editor with its window and input tracking.
pub struct InitializedApplicationState {
    /// The editor session and its renderer
    pub editor_state: EditorState,

    /// Window the editor renders into
    pub window: Arc<Window>,

    /// Collects input between frames
    pub input_manager: InputManager,
}

impl ApplicationState {
    /// Hands the built graphics resources to a new `EditorState`.
    ///
    /// Exits the event loop if the editor cannot be created.
    fn initialize_application_state(&mut self, event_loop: &ActiveEventLoop) {
        let MaybeGraphics::Graphics(gfx) = std::mem::replace(&mut self.graphics, MaybeGraphics::Moved) else {
            return;
        };

        let editor_state = EditorState::new(
            gfx.surface,
            gfx.surface_config,
            gfx.device,
            gfx.queue,
            &gfx.shader_file_string,
            &gfx.material_layers,
            &self.config,
        );

        match editor_state {
            Ok(editor_state) => {
                gfx.window.set_title(&editor_state.window_title());
                self.state = Some(InitializedApplicationState {
                    editor_state,
                    window: gfx.window,
                    input_manager: InputManager::new(),
                });
                info!("Editor ready");
            }
            Err(e) => {
                error!("Failed to start the editor: {}", e);
                event_loop.exit();
            }
        }
    }
}

fn is_exit_request(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event: KeyEvent {
                    state: ElementState::Pressed,
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    ..
                },
                ..
            }
    )
}

impl ApplicationHandler<GraphicsResult> for ApplicationState {
    /// Routes window events: exit requests, resizes, focus loss, redraws,
    /// and raw input for the input manager.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if is_exit_request(&event) {
            event_loop.exit();
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        state.input_manager.intake_input(&event);

        match event {
            WindowEvent::Resized(size) => {
                state.editor_state.resize_surface(size);
            }
            WindowEvent::Focused(false) => {
                state.input_manager.release_all();
            }
            WindowEvent::RedrawRequested => {
                state.editor_state.render();
            }
            _ => (),
        }
    }

    /// Called when the application is resumed, and once at startup.
    ///
    /// Triggers graphics initialization if it has not happened yet.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let MaybeGraphics::Builder(builder) = &mut self.graphics {
            builder.build_and_send(event_loop);
        }
    }

    /// Receives the graphics initialization result.
    ///
    /// On success the application moves to the running state; on failure the
    /// error is logged and the event loop exits.
    fn user_event(&mut self, event_loop: &ActiveEventLoop, graphics: GraphicsResult) {
        match graphics {
            Ok(graphics) => {
                self.graphics = MaybeGraphics::Graphics(graphics);
                self.initialize_application_state(event_loop);
            }
            Err(e) => {
                error!("Failed to initialize graphics: {}", e);
                event_loop.exit();
            }
        }
    }

    /// Runs one editing frame from the input gathered since the last one,
    /// then requests a redraw.
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            let processed_input = state.input_manager.get_and_reset_processed_input();
            state.editor_state.set_input_commands(processed_input);

            let report = state.editor_state.process_frame(web_time::Instant::now());
            if report.material_changed {
                state.window.set_title(&state.editor_state.window_title());
            }

            state.window.request_redraw();
        }
    }
}
