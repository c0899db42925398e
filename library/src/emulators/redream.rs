//! Redream (Sega Dreamcast).
//!
//! Configuration lives in a single flat `redream.cfg` next to the executable,
//! all keys in the root section.

use anyhow::Result;
use emulauncher_core::adapter::{Adapter, Installation, LaunchContext, Services, Session};
use emulauncher_core::binding::{Binding, Rule, apply_rules};
use emulauncher_core::config::Resolution;
use emulauncher_core::document::{IniDocument, KeyPath, with_document};
use emulauncher_core::hooks::{OverlayRequest, ShaderBackend, ShaderRequest};
use emulauncher_core::launch::ArgumentStyle;
use emulauncher_core::options::OptionsSource;
use emulauncher_core::rom::{ResolvedRom, RomPlan};
use emulauncher_shared::{DREAMCAST_DISC_PRIORITY, EmulatorId};

pub const CONFIG_FILE: &str = "redream.cfg";

/// Exit code Redream reports after a normal quit.
const SOFT_EXIT_CODE: i32 = 1;

const ASPECT_OPTION: &str = "redream_aspect";
/// Aspect ratios that fill a 16:9 screen; bezels are disabled for them.
const WIDESCREEN_ASPECTS: &[&str] = &["16:9", "stretch"];

#[derive(Debug, Clone, Copy, Default)]
pub struct RedreamAdapter;

fn key(name: &str) -> KeyPath {
    KeyPath::root(name)
}

fn is_widescreen(options: &dyn OptionsSource) -> bool {
    options
        .get(ASPECT_OPTION)
        .is_some_and(|aspect| WIDESCREEN_ASPECTS.contains(&aspect))
}

/// Rules for `redream.cfg`.
pub fn config_rules(fullscreen: bool, resolution: Resolution) -> Vec<Rule> {
    let mode = if fullscreen {
        "borderless fullscreen"
    } else {
        "windowed"
    };
    let width = resolution.width.to_string();
    let height = resolution.height.to_string();

    vec![
        Rule::set(key("fullmode"), mode),
        Rule::set(key("mode"), mode),
        Rule::set(key("gamedir"), "./../../roms/dreamcast"),
        Binding::new(key("res"), "redream_res", "2").slider().into(),
        Binding::new(key("cable"), "redream_cable", "rgb")
            .enumerated(&[("vga", "vga"), ("rgb", "rgb"), ("composite", "composite")])
            .into(),
        Binding::new(key("broadcast"), "redream_broadcast", "ntsc")
            .enumerated(&[
                ("ntsc", "ntsc"),
                ("pal", "pal"),
                ("pal_m", "pal_m"),
                ("pal_n", "pal_n"),
            ])
            .into(),
        Binding::new(key("language"), "redream_language", "english")
            .enumerated(&[
                ("japanese", "japanese"),
                ("english", "english"),
                ("german", "german"),
                ("french", "french"),
                ("spanish", "spanish"),
                ("italian", "italian"),
            ])
            .into(),
        Binding::new(key("region"), "redream_region", "japan")
            .enumerated(&[("japan", "japan"), ("usa", "usa"), ("europe", "europe")])
            .into(),
        Binding::new(key("vsync"), "redream_vsync", "1")
            .boolean("1", "0")
            .into(),
        Binding::new(key("frameskip"), "redream_frameskip", "0")
            .boolean("1", "0")
            .into(),
        Binding::new(key("aspect"), ASPECT_OPTION, "4:3")
            .enumerated(&[("4:3", "4:3"), ("16:9", "16:9"), ("stretch", "stretch")])
            .into(),
        Rule::set(key("fullwidth"), width.clone()),
        Rule::set(key("fullheight"), height.clone()),
        Rule::set(key("width"), width),
        Rule::set(key("height"), height),
    ]
}

impl Adapter for RedreamAdapter {
    fn id(&self) -> EmulatorId {
        EmulatorId::Redream
    }

    fn rom_plan(&self, _ctx: &LaunchContext<'_>, _install: &Installation) -> RomPlan {
        RomPlan {
            disc_priority: DREAMCAST_DISC_PRIORITY,
            ..RomPlan::default()
        }
    }

    fn synthesize_config(
        &self,
        ctx: &LaunchContext<'_>,
        install: &Installation,
        _rom: &ResolvedRom,
    ) -> Result<()> {
        let path = install.directory.join(CONFIG_FILE);
        tracing::info!("Writing {}", path.display());

        let rules = config_rules(ctx.fullscreen(), ctx.resolution());
        with_document::<IniDocument, _, _>(&path, |doc| {
            let report = apply_rules(doc, &rules, ctx.binding_context());
            tracing::debug!("{}: {} keys written", CONFIG_FILE, report.written);
            Ok(())
        })
    }

    fn argument_style(&self) -> ArgumentStyle {
        ArgumentStyle::default()
    }

    fn prepare_session(
        &self,
        ctx: &LaunchContext<'_>,
        install: &Installation,
        rom: &ResolvedRom,
    ) -> Session {
        let bezel = !is_widescreen(ctx.options) && !ctx.options.get_bool("forceNoBezel");
        let resolution = ctx.resolution();
        let shader = ShaderRequest {
            backend: ShaderBackend::OpenGl,
            x64: true,
            system: ctx.request.system.clone(),
            rom: rom.path.clone(),
            working_dir: install.directory.clone(),
            resolution,
            emulator: ctx.request.emulator.clone(),
            bezel,
        };
        let overlay = bezel.then(|| OverlayRequest {
            system: ctx.request.system.clone(),
            rom: rom.path.clone(),
            resolution,
            emulator: ctx.request.emulator.clone(),
        });

        Session {
            shader: Some(shader),
            overlay,
        }
    }

    fn post_run(&self, exit_code: i32, _install: &Installation, _services: &Services) -> i32 {
        if exit_code == SOFT_EXIT_CODE {
            0
        } else {
            exit_code
        }
    }
}
