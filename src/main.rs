use anyhow::{anyhow, Context, Result};
use glam::{Vec3, Vec4};
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{info, LevelFilter};
use raw_window_handle::HasRawWindowHandle;
use simple_logger::SimpleLogger;
use std::{ffi::CString, num::NonZeroU32, path::PathBuf, ptr, time::Instant};
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::{Window, WindowBuilder},
};

use rigid_shader::{
    config::{self, ShaderConfig, ViewerConfig},
    render::{shaders::default_shaders, Camera, Mesh, MeshData, ShaderProgram},
    utils::math,
};

// GL objects come first so they are dropped while the context is alive
struct App {
    shader: ShaderProgram,
    mesh: Mesh,
    camera: Camera,
    config: ViewerConfig,
    start: Instant,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
}

fn build_shader(shader: &mut ShaderProgram, config: &ShaderConfig) {
    let result = match config.file_paths() {
        Some((vertex_path, fragment_path)) => {
            info!(
                "Building shader from {} and {}",
                vertex_path.display(),
                fragment_path.display()
            );
            shader.create_from_file(vertex_path, fragment_path)
        }
        None => shader.create_from_source(default_shaders::VERTEX_SRC, default_shaders::FRAGMENT_SRC),
    };

    match result {
        Ok(()) => info!("Shader program {} ready", shader.id()),
        Err(e) => log::warn!("{}; program {} will not draw correctly", e, shader.id()),
    }
}

impl App {
    fn new(event_loop: &EventLoop<()>, config: ViewerConfig) -> Result<Self> {
        let window_builder = WindowBuilder::new()
            .with_title(config.window.title.clone())
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));

        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("display offered no GL configs")
            })
            .map_err(|e| anyhow!("Failed to build GL display: {}", e))?;

        let window = window.context("Display builder did not create a window")?;
        let raw_window_handle = window.raw_window_handle();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();

        let not_current = unsafe {
            gl_display
                .create_context(&gl_config, &context_attributes)
                .context("Failed to create OpenGL context")?
        };

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe {
            gl_display
                .create_window_surface(&gl_config, &attrs)
                .context("Failed to create GL surface")?
        };

        let gl_context = not_current
            .make_current(&gl_surface)
            .context("Failed to make context current")?;

        if config.window.vsync {
            if let Err(e) =
                gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
            {
                log::warn!("Could not enable vsync: {}", e);
            }
        }

        // Load OpenGL functions
        gl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(&symbol),
            Err(_) => ptr::null(),
        });

        unsafe {
            gl::Enable(gl::DEPTH_TEST);
            gl::Enable(gl::CULL_FACE);
            gl::CullFace(gl::BACK);
            gl::FrontFace(gl::CCW);
        }

        let mut shader = ShaderProgram::new();
        build_shader(&mut shader, &config.shader);

        let mesh = Mesh::upload(&MeshData::cuboid(Vec3::new(0.8, 0.5, 0.3)));

        let size = window.inner_size();
        let mut camera = Camera::looking_at_origin(
            config.scene.camera_distance,
            config.scene.fov,
            1.0,
        );
        camera.set_viewport(size.width, size.height);

        Ok(Self {
            shader,
            mesh,
            camera,
            config,
            start: Instant::now(),
            gl_surface,
            gl_context,
            window,
        })
    }

    fn reload_shader(&mut self) {
        info!("Reloading shader program {}", self.shader.id());
        build_shader(&mut self.shader, &self.config.shader);
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        {
            self.gl_surface.resize(&self.gl_context, width, height);
            unsafe {
                gl::Viewport(0, 0, size.width as i32, size.height as i32);
            }
            self.camera.set_viewport(size.width, size.height);
        }
    }

    /// Returns true when the key asks the viewer to quit.
    fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if event.state != ElementState::Pressed || event.repeat {
            return false;
        }

        match event.logical_key.as_ref() {
            Key::Named(NamedKey::Escape) => true,
            Key::Character("r") | Key::Character("R") => {
                self.reload_shader();
                false
            }
            _ => false,
        }
    }

    fn redraw(&mut self) -> Result<()> {
        let scene = &self.config.scene;
        let seconds = self.start.elapsed().as_secs_f32();
        let model = math::spin(Vec3::new(1.0, 1.0, 0.0), scene.spin_speed, seconds);
        let model_view = self.camera.view_matrix() * model;
        let [r, g, b, a] = scene.clear_color;

        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }

        self.shader.set_used();
        debug_assert_eq!(self.shader.driver().active_program(), self.shader.id());
        self.shader
            .set_uniform("modelViewProjectionMatrix", self.camera.projection_matrix() * model_view);
        self.shader
            .set_uniform("normalMatrix", math::normal_matrix(model_view));
        self.shader.set_uniform("color", Vec4::from(scene.body_color));
        self.mesh.draw();

        self.gl_surface
            .swap_buffers(&self.gl_context)
            .context("Failed to swap buffers")
    }
}

fn main() -> Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Info).init()?;
    info!("Initializing viewer...");

    let config_path = match std::env::args_os().nth(1) {
        Some(path) => PathBuf::from(path),
        None => config::default_config_path()?,
    };
    let config = config::load_or_create_config(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(&event_loop, config)?;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => app.resize(size),
            WindowEvent::KeyboardInput { event, .. } => {
                if app.handle_key(&event) {
                    elwt.exit();
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = app.redraw() {
                    log::error!("{:#}", e);
                    elwt.exit();
                }
            }
            _ => (),
        },
        Event::AboutToWait => app.window.request_redraw(),
        _ => (),
    })?;

    Ok(())
}
