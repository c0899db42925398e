//! `config.yml`: emulation settings.

use std::path::{Path, PathBuf};

use anyhow::Result;
use emulauncher_core::binding::{Binding, BindingContext, Guard, GuardChain, Rule, apply_rules};
use emulauncher_core::document::{Scope, YmlDocument, with_document};

pub fn config_path(install_dir: &Path) -> PathBuf {
    install_dir.join("config.yml")
}

/// Raw option binding whose fallback equals its default.
fn feature(scope: &Scope, key: &str, option: &str, default: &str) -> Rule {
    Binding::new(scope.key(key), option, default).into()
}

/// Boolean option binding; absent means `off`.
fn bool_feature(scope: &Scope, key: &str, option: &str, on: &str, off: &str) -> Rule {
    Binding::new(scope.key(key), option, off)
        .boolean(on, off)
        .into()
}

fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn input_output_rules() -> Vec<Rule> {
    let io = Scope::section("Input/Output");
    vec![
        feature(&io, "Keyboard", "rpcs3_keyboard", "\"Null\""),
        feature(&io, "Mouse", "rpcs3_mouse", "\"Null\""),
        feature(&io, "Move", "rpcs3_move", "\"Null\""),
        feature(&io, "Camera", "rpcs3_camera", "\"Null\""),
        GuardChain::new("rpcs3_cameraType")
            .when(
                Guard::non_empty("rpcs3_cameraType"),
                vec![
                    feature(&io, "Camera type", "rpcs3_cameraType", ""),
                    GuardChain::new("rpcs3_camera")
                        .when(Guard::unset("rpcs3_camera"), vec![Rule::set(io.key("Camera"), "Fake")])
                        .into(),
                    Rule::set_if_blank(io.key("Camera ID"), "Default"),
                ],
            )
            .into(),
    ]
}

fn core_rules() -> Vec<Rule> {
    let core = Scope::section("Core");
    vec![
        feature(&core, "PPU Decoder", "ppudecoder", "Recompiler (LLVM)"),
        feature(&core, "LLVM Precompilation", "lvmprecomp", "true"),
        feature(&core, "SPU Decoder", "spudecoder", "Recompiler (LLVM)"),
        feature(&core, "Preferred SPU Threads", "sputhreads", "0"),
        feature(&core, "SPU loop detection", "spuloopdetect", "false"),
        feature(&core, "SPU Block Size", "spublocksize", "Safe"),
        feature(&core, "Accurate RSX reservation access", "accuratersx", "false"),
        feature(&core, "PPU Accurate Vector NaN Values", "vectornan", "false"),
        feature(&core, "Full Width AVX-512", "fullavx", "false"),
        feature(&core, "XFloat Accuracy", "rpcs3_xfloat", "Accurate"),
    ]
}

fn video_rules() -> Vec<Rule> {
    let video = Scope::section("Video");
    let zcull = |relaxed: bool, accurate: bool| {
        vec![
            Rule::set(video.key("Relaxed ZCULL Sync"), flag(relaxed)),
            Rule::set(video.key("Accurate ZCULL stats"), flag(accurate)),
        ]
    };

    vec![
        feature(&video, "Renderer", "gfxbackend", "Vulkan"),
        Rule::set(video.key("Resolution"), "1280x720"),
        feature(&video, "Resolution Scale", "rpcs3_internal_resolution", "100"),
        feature(&video, "Aspect ratio", "rpcs3_ratio", "16:9"),
        feature(&video, "Frame limit", "framelimit", "Auto"),
        feature(&video, "MSAA", "msaa", "Auto"),
        feature(&video, "Shader Mode", "shadermode", "Async Shader Recompiler"),
        feature(&video, "Write Color Buffers", "writecolorbuffers", "false"),
        feature(&video, "Write Depth Buffer", "writedepthbuffers", "false"),
        feature(&video, "Read Color Buffers", "readcolorbuffers", "false"),
        feature(&video, "Read Depth Buffer", "readdepthbuffers", "false"),
        feature(&video, "VSync", "rpcs3_vsync", "true"),
        feature(&video, "Stretch To Display Area", "stretchtodisplay", "false"),
        feature(&video, "Strict Rendering Mode", "strict_rendering", "false"),
        feature(&video, "Disable Vertex Cache", "disablevertex", "false"),
        feature(&video, "Multithreaded RSX", "multithreadedrsx", "false"),
        feature(&video, "Output Scaling Mode", "rpcs3_scaling_filter", "Nearest"),
        feature(&video, "3D Display Mode", "enable3d", "Disabled"),
        feature(&video, "Anisotropic Filter Override", "anisotropicfilter", "0"),
        feature(&video, "Shader Precision", "shader_quality", "Auto"),
        feature(&video, "Driver Wake-Up Delay", "driver_wake", "1"),
        bool_feature(&video, "Force CPU Blit", "cpu_blit", "true", "false"),
        bool_feature(
            &video,
            "Disable ZCull Occlusion Queries",
            "disable_zcull_queries",
            "true",
            "false",
        ),
        GuardChain::new("zcull_accuracy")
            .when(Guard::equals("zcull_accuracy", "Approximate"), zcull(false, false))
            .when(Guard::equals("zcull_accuracy", "Relaxed"), zcull(true, false))
            .otherwise(zcull(false, true))
            .into(),
    ]
}

fn vulkan_rules() -> Vec<Rule> {
    let vulkan = Scope::section("Video").child("Vulkan");
    vec![
        feature(&vulkan, "Asynchronous Texture Streaming 2", "asynctexturestream", "false"),
        feature(&vulkan, "Exclusive Fullscreen Mode", "rpcs3_fullscreen_mode", "Automatic"),
    ]
}

fn performance_overlay_rules() -> Vec<Rule> {
    let overlay = Scope::section("Video").child("Performance Overlay");
    let set = |enabled: bool, graphs: bool| {
        vec![
            Rule::set(overlay.key("Enabled"), flag(enabled)),
            Rule::set(overlay.key("Enable Framerate Graph"), flag(graphs)),
            Rule::set(overlay.key("Enable Frametime Graph"), flag(graphs)),
        ]
    };

    vec![
        GuardChain::new("performance_overlay")
            .when(Guard::equals("performance_overlay", "detailed"), set(true, true))
            .when(Guard::equals("performance_overlay", "simple"), set(true, false))
            .otherwise(set(false, false))
            .into(),
    ]
}

fn audio_rules() -> Vec<Rule> {
    let audio = Scope::section("Audio");
    let stretch = |enabled: bool, threshold: &str| {
        vec![
            Rule::set(audio.key("Enable time stretching"), flag(enabled)),
            Rule::set(audio.key("Time Stretching Threshold"), threshold),
        ]
    };

    vec![
        feature(&audio, "Renderer", "audiobackend", "Cubeb"),
        feature(&audio, "Audio Format", "audiochannels", "Stereo"),
        feature(&audio, "Enable Buffering", "audio_buffering", "true"),
        GuardChain::new("time_stretching")
            .when(Guard::equals("time_stretching", "low"), stretch(true, "25"))
            .when(Guard::equals("time_stretching", "medium"), stretch(true, "50"))
            .when(Guard::equals("time_stretching", "high"), stretch(true, "75"))
            .otherwise(stretch(false, "75"))
            .into(),
    ]
}

fn system_rules(default_language: &str) -> Vec<Rule> {
    let system = Scope::section("System");
    vec![
        feature(&system, "License Area", "ps3_region", "SCEE"),
        feature(&system, "Language", "ps3_language", default_language),
    ]
}

fn miscellaneous_rules(fullscreen: bool) -> Vec<Rule> {
    let misc = Scope::section("Miscellaneous");
    vec![
        Rule::set(misc.key("Start games in fullscreen mode"), flag(fullscreen)),
        feature(&misc, "Show trophy popups", "show_trophy", "true"),
        Rule::set(misc.key("Automatically start games after boot"), "true"),
        Rule::set(misc.key("Exit RPCS3 when process finishes"), "true"),
        Rule::set(misc.key("Prevent display sleep while running games"), "true"),
        bool_feature(&misc, "Show shader compilation hint", "rpcs3_hidehints", "false", "true"),
        bool_feature(&misc, "Show PPU compilation hint", "rpcs3_hidehints", "false", "true"),
    ]
}

/// Every `config.yml` rule, in file order.
pub fn config_rules(fullscreen: bool, default_language: &str) -> Vec<Rule> {
    let mut rules = input_output_rules();
    rules.extend(core_rules());
    rules.extend(video_rules());
    rules.extend(vulkan_rules());
    rules.extend(performance_overlay_rules());
    rules.extend(audio_rules());
    rules.extend(system_rules(default_language));
    rules.extend(miscellaneous_rules(fullscreen));
    rules
}

pub fn write_config(
    install_dir: &Path,
    fullscreen: bool,
    default_language: &str,
    ctx: BindingContext<'_>,
) -> Result<()> {
    let path = config_path(install_dir);
    tracing::info!("Writing {}", path.display());

    let rules = config_rules(fullscreen, default_language);
    with_document::<YmlDocument, _, _>(&path, |doc| {
        let report = apply_rules(doc, &rules, ctx);
        tracing::debug!(
            "config.yml: {} keys written, {} rules skipped",
            report.written,
            report.skipped
        );
        Ok(())
    })
}
