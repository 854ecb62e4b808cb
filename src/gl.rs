use crate::config::Variant;
use crate::core::{shader_uniforms, Palette, Renderer, Scene, SurfaceConfig, GRID_FRAG, GRID_VERT};
use crate::dom;
use crate::error::EngineError;
use web_sys::{
    HtmlCanvasElement, WebGlBuffer, WebGlProgram, WebGlRenderingContext as GL, WebGlShader,
    WebGlUniformLocation,
};

// one oversized triangle covers clip space
const FULLSCREEN_TRIANGLE: [f32; 6] = [-1.0, -1.0, 3.0, -1.0, -1.0, 3.0];

/// Shader-grid variant: a procedural fragment shader over a full-screen
/// triangle.
pub struct GridRenderer {
    canvas: HtmlCanvasElement,
    gl: GL,
    program: WebGlProgram,
    vert: WebGlShader,
    frag: WebGlShader,
    buffer: WebGlBuffer,
    u_time: Option<WebGlUniformLocation>,
    u_res: Option<WebGlUniformLocation>,
    u_gain: Option<WebGlUniformLocation>,
    still_css: String,
    /// The still gradient is showing through the canvas background.
    still_shown: bool,
}

impl GridRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, EngineError> {
        let gl = dom::context_webgl(&canvas)?;
        let vert = compile_shader(&gl, GL::VERTEX_SHADER, GRID_VERT)?;
        let frag = match compile_shader(&gl, GL::FRAGMENT_SHADER, GRID_FRAG) {
            Ok(f) => f,
            Err(e) => {
                gl.delete_shader(Some(&vert));
                return Err(e);
            }
        };
        let program = match link_program(&gl, &vert, &frag) {
            Ok(p) => p,
            Err(e) => {
                gl.delete_shader(Some(&vert));
                gl.delete_shader(Some(&frag));
                return Err(e);
            }
        };
        gl.use_program(Some(&program));

        let buffer = match upload_triangle(&gl, &program) {
            Ok(b) => b,
            Err(e) => {
                gl.delete_program(Some(&program));
                gl.delete_shader(Some(&vert));
                gl.delete_shader(Some(&frag));
                return Err(e);
            }
        };

        let u_time = gl.get_uniform_location(&program, "u_time");
        let u_res = gl.get_uniform_location(&program, "u_res");
        let u_gain = gl.get_uniform_location(&program, "u_gain");
        log::debug!("[gl] grid program ready");
        Ok(Self {
            canvas,
            gl,
            program,
            vert,
            frag,
            buffer,
            u_time,
            u_res,
            u_gain,
            still_css: Palette::for_variant(Variant::ShaderGrid).still_css(),
            still_shown: false,
        })
    }

    pub fn still_shown(&self) -> bool {
        self.still_shown
    }
}

impl Renderer for GridRenderer {
    fn resize(&mut self, surface: &SurfaceConfig) {
        dom::sync_canvas_backing_size(&self.canvas, surface);
        self.gl
            .viewport(0, 0, surface.physical_width as i32, surface.physical_height as i32);
    }

    fn draw(&mut self, scene: &Scene<'_>) {
        if self.still_shown {
            _ = self.canvas.style().remove_property("background");
            self.still_shown = false;
        }
        let u = shader_uniforms(scene);
        self.gl.clear_color(0.0, 0.0, 0.0, 0.0);
        self.gl.clear(GL::COLOR_BUFFER_BIT);
        self.gl.uniform1f(self.u_time.as_ref(), u.time_ms);
        self.gl
            .uniform2f(self.u_res.as_ref(), u.resolution[0], u.resolution[1]);
        self.gl.uniform1f(self.u_gain.as_ref(), u.gain);
        self.gl.draw_arrays(GL::TRIANGLES, 0, 3);
    }

    fn draw_static(&mut self, _surface: &SurfaceConfig) {
        self.gl.clear_color(0.0, 0.0, 0.0, 0.0);
        self.gl.clear(GL::COLOR_BUFFER_BIT);
        self.still_shown = self
            .canvas
            .style()
            .set_property("background", &self.still_css)
            .is_ok();
    }

    fn release(&mut self) {
        self.gl.delete_buffer(Some(&self.buffer));
        self.gl.delete_program(Some(&self.program));
        self.gl.delete_shader(Some(&self.vert));
        self.gl.delete_shader(Some(&self.frag));
    }
}

fn upload_triangle(gl: &GL, program: &WebGlProgram) -> Result<WebGlBuffer, EngineError> {
    let pos = gl.get_attrib_location(program, "a_pos");
    if pos < 0 {
        return Err(EngineError::ShaderLink("attribute a_pos missing".into()));
    }
    let buffer = gl
        .create_buffer()
        .ok_or_else(|| EngineError::surface("webgl buffer allocation failed"))?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    let vertices = js_sys::Float32Array::from(&FULLSCREEN_TRIANGLE[..]);
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &vertices, GL::STATIC_DRAW);
    gl.enable_vertex_attrib_array(pos as u32);
    gl.vertex_attrib_pointer_with_i32(pos as u32, 2, GL::FLOAT, false, 0, 0);
    Ok(buffer)
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, EngineError> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| EngineError::surface("webgl shader allocation failed"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        log::warn!("[gl] shader compile error: {}", info);
        Err(EngineError::ShaderCompile(info))
    }
}

fn link_program(
    gl: &GL,
    vert: &WebGlShader,
    frag: &WebGlShader,
) -> Result<WebGlProgram, EngineError> {
    let program = gl
        .create_program()
        .ok_or_else(|| EngineError::surface("webgl program allocation failed"))?;
    gl.attach_shader(&program, vert);
    gl.attach_shader(&program, frag);
    gl.link_program(&program);
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let info = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        log::warn!("[gl] program link error: {}", info);
        Err(EngineError::ShaderLink(info))
    }
}
