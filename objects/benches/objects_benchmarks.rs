use std::rc::Rc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use glimmer_objects::{
    Buffer, BufferUsage, Context, DummyDriver, Program, Shader, ShaderType, StaticStringSource,
    StringSource, Texture, include,
};

const VERTEX: &str = "#version 450
layout(location = 0) in vec3 a_position;
void main() {
    gl_Position = vec4(a_position, 1.0);
}
";

// ---------------------------------------------------------------------------
// Object creation
// ---------------------------------------------------------------------------

fn bench_create_texture(c: &mut Criterion) {
    let context = Context::new(DummyDriver::with_call_log_limit(0));

    c.bench_function("dummy_create_texture_256x256", |b| {
        b.iter(|| {
            let texture = Texture::new(&context);
            texture.storage_2d(9, glimmer_objects::gl::RGBA8, 256, 256);
            black_box(texture);
        });
    });
}

fn bench_create_buffer(c: &mut Criterion) {
    let context = Context::new(DummyDriver::with_call_log_limit(0));
    let data = vec![0u8; 1024];

    c.bench_function("dummy_create_buffer_1kb", |b| {
        b.iter(|| {
            let buffer = Buffer::new(&context);
            buffer.set_data(&data, BufferUsage::StaticDraw);
            black_box(buffer);
        });
    });
}

// ---------------------------------------------------------------------------
// Shaders
// ---------------------------------------------------------------------------

fn bench_include_processing(c: &mut Criterion) {
    let context = Context::new(DummyDriver::new());
    for i in 0..16 {
        let text = format!("#include \"/lib/part_{}.glsl\"\nfloat f{i}() {{ return {i}.0; }}\n", i + 1);
        let source: Rc<dyn StringSource> = Rc::new(StaticStringSource::new(text));
        context
            .register_named_string(format!("/lib/part_{i}.glsl"), source)
            .expect("valid name");
    }
    let leaf: Rc<dyn StringSource> = Rc::new(StaticStringSource::new("// leaf"));
    context
        .register_named_string("/lib/part_16.glsl", leaf)
        .expect("valid name");

    c.bench_function("include_chain_16", |b| {
        b.iter(|| {
            black_box(include::process(&context, "#include <part_0.glsl>\n", &["/lib".into()]).ok());
        });
    });
}

fn bench_recompile_after_change(c: &mut Criterion) {
    let context = Context::new(DummyDriver::with_call_log_limit(0));
    let source = Rc::new(StaticStringSource::new(VERTEX));
    let shader = Shader::with_source(&context, ShaderType::Vertex, source.clone());
    let program = Program::with_shaders(&context, &[shader]);

    c.bench_function("vertex_shader_change_and_relink", |b| {
        b.iter(|| {
            source.set_string(VERTEX);
            black_box(program.link());
        });
    });
}

criterion_group!(
    benches,
    bench_create_texture,
    bench_create_buffer,
    bench_include_processing,
    bench_recompile_after_change,
);
criterion_main!(benches);
