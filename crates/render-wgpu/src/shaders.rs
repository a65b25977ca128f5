/// WGSL shader for the terrain tiles: height-field displacement in the
/// vertex stage, then grid shading, two spotlights, and depth fog in the
/// fragment stage. Two fragment entry points select the grid source:
/// `fs_procedural` evaluates the analytic anti-aliased grid,
/// `fs_texture` samples the grid bitmap instead.
pub const TERRAIN_SHADER: &str = r#"
const PI: f32 = 3.14159265;
const TAU: f32 = 6.28318531;

struct Spotlight {
    position: vec4<f32>,   // xyz world position, w falloff distance
    direction: vec4<f32>,  // xyz normalized cone axis, w decay exponent
    color: vec4<f32>,      // rgb color, w intensity
    cone: vec4<f32>,       // x cos outer angle, y cos inner angle
};

struct Globals {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    camera: vec4<f32>,     // xyz eye position, w elapsed seconds
    fog: vec4<f32>,        // rgb fog color, w fog near
    params: vec4<f32>,     // x fog far, y grid frequency, z displacement scale, w metalness
    material: vec4<f32>,   // x roughness
    lights: array<Spotlight, 2>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

@group(1) @binding(0) var map_sampler: sampler;
@group(1) @binding(1) var displacement_map: texture_2d<f32>;
@group(1) @binding(2) var metalness_map: texture_2d<f32>;
@group(1) @binding(3) var grid_map: texture_2d<f32>;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct TileInput {
    @location(2) offset: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) world_pos: vec3<f32>,
    @location(2) view_depth: f32,
};

@vertex
fn vs_terrain(vertex: VertexInput, tile: TileInput) -> VertexOutput {
    let height = textureSampleLevel(displacement_map, map_sampler, vertex.uv, 0.0).r;
    let displaced = vertex.position + vec3<f32>(0.0, height * globals.params.z, 0.0);
    let world_pos = displaced + tile.offset;

    var out: VertexOutput;
    out.clip_position = globals.view_proj * vec4<f32>(world_pos, 1.0);
    out.uv = vertex.uv;
    out.world_pos = world_pos;
    out.view_depth = -(globals.view * vec4<f32>(world_pos, 1.0)).z;
    return out;
}

// Anti-aliased step: 1 below the threshold, feathered over the signal's
// screen-space footprint.
fn aastep(threshold: f32, value: f32) -> f32 {
    let afwidth = length(vec2<f32>(dpdx(value), dpdy(value))) * 0.70710678;
    return 1.0 - smoothstep(threshold - afwidth, threshold + afwidth, value);
}

// Raised-cosine line signal: zero at every 1/frequency multiple, so the
// anti-aliased step picks the lattice out as lines.
fn grid_axis(coord: f32, frequency: f32) -> f32 {
    let signal = 1.0 + cos(coord * frequency * TAU - PI);
    let threshold = fwidth(coord * frequency);
    return aastep(threshold, signal);
}

fn shade(albedo: vec3<f32>, metal_sample: f32, in: VertexOutput) -> vec4<f32> {
    // The plane keeps its flat normal after displacement; the grid and the
    // spotlights carry the sense of relief.
    let normal = vec3<f32>(0.0, 1.0, 0.0);
    let view_dir = normalize(globals.camera.xyz - in.world_pos);
    let metalness = globals.params.w * metal_sample;
    let roughness = globals.material.x;
    let shininess = exp2(10.0 * (1.0 - roughness) + 1.0);

    var lit = albedo * 0.3;
    for (var i = 0u; i < 2u; i++) {
        let light = globals.lights[i];
        let to_frag = in.world_pos - light.position.xyz;
        let dist = length(to_frag);
        let frag_dir = to_frag / max(dist, 1e-5);

        let range = max(1.0 - dist / light.position.w, 0.0);
        let dist_atten = pow(range, light.direction.w);
        let cone_atten = smoothstep(light.cone.x, light.cone.y, dot(frag_dir, light.direction.xyz));
        let radiance = light.color.rgb * light.color.w * dist_atten * cone_atten;

        let light_dir = -frag_dir;
        let diffuse = max(dot(normal, light_dir), 0.0);
        let half_dir = normalize(light_dir + view_dir);
        let specular = pow(max(dot(normal, half_dir), 0.0), shininess) * metalness;

        lit += albedo * radiance * diffuse / PI + radiance * specular;
    }

    let fog_amount = smoothstep(globals.fog.w, globals.params.x, in.view_depth);
    return vec4<f32>(mix(lit, globals.fog.rgb, fog_amount), 1.0);
}

@fragment
fn fs_procedural(in: VertexOutput) -> @location(0) vec4<f32> {
    let metal = textureSample(metalness_map, map_sampler, in.uv).r;
    let frequency = globals.params.y;
    let grid = grid_axis(in.uv.x, frequency) + grid_axis(in.uv.y, frequency);
    let albedo = vec3<f32>(grid, grid * 0.3, grid * 0.5);
    return shade(albedo, metal, in);
}

@fragment
fn fs_texture(in: VertexOutput) -> @location(0) vec4<f32> {
    let metal = textureSample(metalness_map, map_sampler, in.uv).r;
    let albedo = textureSample(grid_map, map_sampler, in.uv).rgb;
    return shade(albedo, metal, in);
}
"#;

/// WGSL shader for the chromatic shift pass: red and blue are sampled at
/// mirrored UV offsets while green stays put.
pub const SHIFT_SHADER: &str = r#"
struct ShiftParams {
    amount: f32,
    angle: f32,
    _pad0: f32,
    _pad1: f32,
};

@group(0) @binding(0) var frame_sampler: sampler;
@group(0) @binding(1) var frame: texture_2d<f32>;
@group(0) @binding(2) var<uniform> params: ShiftParams;

struct FullscreenOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_fullscreen(@builtin(vertex_index) index: u32) -> FullscreenOutput {
    // One oversized triangle covering the viewport.
    let corner = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    var out: FullscreenOutput;
    out.clip_position = vec4<f32>(corner * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(corner.x, 1.0 - corner.y);
    return out;
}

@fragment
fn fs_shift(in: FullscreenOutput) -> @location(0) vec4<f32> {
    let offset = params.amount * vec2<f32>(cos(params.angle), sin(params.angle));
    let r = textureSample(frame, frame_sampler, in.uv + offset).r;
    let center = textureSample(frame, frame_sampler, in.uv);
    let b = textureSample(frame, frame_sampler, in.uv - offset).b;
    return vec4<f32>(r, center.g, b, center.a);
}
"#;

/// WGSL shader for the gamma pass: linear to sRGB transfer, applied once
/// because the swapchain itself is configured linear.
pub const GAMMA_SHADER: &str = r#"
@group(0) @binding(0) var frame_sampler: sampler;
@group(0) @binding(1) var frame: texture_2d<f32>;

struct FullscreenOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_fullscreen(@builtin(vertex_index) index: u32) -> FullscreenOutput {
    let corner = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    var out: FullscreenOutput;
    out.clip_position = vec4<f32>(corner * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(corner.x, 1.0 - corner.y);
    return out;
}

fn linear_to_srgb(c: f32) -> f32 {
    let v = clamp(c, 0.0, 1.0);
    if v <= 0.0031308 {
        return v * 12.92;
    }
    return 1.055 * pow(v, 1.0 / 2.4) - 0.055;
}

@fragment
fn fs_gamma(in: FullscreenOutput) -> @location(0) vec4<f32> {
    let c = textureSample(frame, frame_sampler, in.uv);
    return vec4<f32>(linear_to_srgb(c.r), linear_to_srgb(c.g), linear_to_srgb(c.b), c.a);
}
"#;

/// WGSL shader for the bloom bright pass: luminance-gated copy into the
/// half-resolution glow chain.
pub const BLOOM_BRIGHT_SHADER: &str = r#"
struct BrightParams {
    threshold: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
};

@group(0) @binding(0) var frame_sampler: sampler;
@group(0) @binding(1) var frame: texture_2d<f32>;
@group(0) @binding(2) var<uniform> params: BrightParams;

struct FullscreenOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_fullscreen(@builtin(vertex_index) index: u32) -> FullscreenOutput {
    let corner = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    var out: FullscreenOutput;
    out.clip_position = vec4<f32>(corner * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(corner.x, 1.0 - corner.y);
    return out;
}

@fragment
fn fs_bright(in: FullscreenOutput) -> @location(0) vec4<f32> {
    let color = textureSample(frame, frame_sampler, in.uv);
    let luma = dot(color.rgb, vec3<f32>(0.299, 0.587, 0.114));
    let gate = smoothstep(params.threshold, params.threshold + 0.01, luma);
    return vec4<f32>(color.rgb * gate, 1.0);
}
"#;

/// WGSL shader for one separable Gaussian blur tap row. The direction
/// uniform selects horizontal or vertical and carries the radius scale.
pub const BLOOM_BLUR_SHADER: &str = r#"
struct BlurParams {
    direction: vec2<f32>,  // texel step including the radius scale
    _pad0: f32,
    _pad1: f32,
};

@group(0) @binding(0) var frame_sampler: sampler;
@group(0) @binding(1) var frame: texture_2d<f32>;
@group(0) @binding(2) var<uniform> params: BlurParams;

struct FullscreenOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_fullscreen(@builtin(vertex_index) index: u32) -> FullscreenOutput {
    let corner = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    var out: FullscreenOutput;
    out.clip_position = vec4<f32>(corner * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(corner.x, 1.0 - corner.y);
    return out;
}

@fragment
fn fs_blur(in: FullscreenOutput) -> @location(0) vec4<f32> {
    var weights = array<f32, 4>(0.1945946, 0.1216216, 0.054054, 0.016216);
    var acc = textureSample(frame, frame_sampler, in.uv).rgb * 0.227027;
    for (var i = 0u; i < 4u; i++) {
        let offset = params.direction * f32(i + 1u);
        acc += textureSample(frame, frame_sampler, in.uv + offset).rgb * weights[i];
        acc += textureSample(frame, frame_sampler, in.uv - offset).rgb * weights[i];
    }
    return vec4<f32>(acc, 1.0);
}
"#;

/// WGSL shader for the bloom composite: the corrected frame plus the
/// blurred glow, weighted by strength, onto the swapchain.
pub const BLOOM_COMPOSITE_SHADER: &str = r#"
struct CompositeParams {
    strength: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
};

@group(0) @binding(0) var frame_sampler: sampler;
@group(0) @binding(1) var frame: texture_2d<f32>;
@group(0) @binding(2) var glow: texture_2d<f32>;
@group(0) @binding(3) var<uniform> params: CompositeParams;

struct FullscreenOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_fullscreen(@builtin(vertex_index) index: u32) -> FullscreenOutput {
    let corner = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    var out: FullscreenOutput;
    out.clip_position = vec4<f32>(corner * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(corner.x, 1.0 - corner.y);
    return out;
}

@fragment
fn fs_composite(in: FullscreenOutput) -> @location(0) vec4<f32> {
    let base = textureSample(frame, frame_sampler, in.uv);
    let bloom = textureSample(glow, frame_sampler, in.uv).rgb;
    return vec4<f32>(base.rgb + bloom * params.strength, base.a);
}
"#;
