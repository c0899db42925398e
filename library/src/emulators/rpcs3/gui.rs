//! `GuiConfigs/CurrentSettings.ini`: silence the GUI prompts that would block
//! an unattended launch.

use std::path::{Path, PathBuf};

use anyhow::Result;
use emulauncher_core::binding::{Binding, BindingContext, Rule, apply_rules};
use emulauncher_core::document::{IniDocument, Scope, with_document};

pub fn gui_settings_path(install_dir: &Path) -> PathBuf {
    install_dir.join("GuiConfigs").join("CurrentSettings.ini")
}

pub fn gui_rules() -> Vec<Rule> {
    let main_window = Scope::section("main_window");
    let meta = Scope::section("Meta");
    let gs_frame = Scope::section("GSFrame");

    vec![
        Rule::set(main_window.key("confirmationBoxExitGame"), "false"),
        Rule::set(main_window.key("infoBoxEnabledInstallPUP"), "false"),
        Rule::set(main_window.key("infoBoxEnabledWelcome"), "false"),
        Rule::set(main_window.key("confirmationBoxBootGame"), "false"),
        Rule::set(main_window.key("infoBoxEnabledInstallPKG"), "false"),
        Rule::set(meta.key("checkUpdateStart"), "false"),
        Binding::new(meta.key("useRichPresence"), "discord", "false")
            .boolean("true", "false")
            .into(),
        // Light guns need the cursor free.
        Binding::new(gs_frame.key("lockMouseInFullscreen"), "rpcs3_guns", "true")
            .boolean("false", "true")
            .into(),
        Rule::set(gs_frame.key("disableMouse"), "true"),
    ]
}

pub fn write_gui_settings(install_dir: &Path, ctx: BindingContext<'_>) -> Result<()> {
    let path = gui_settings_path(install_dir);
    tracing::info!("Writing {}", path.display());
    with_document::<IniDocument, _, _>(&path, |doc| {
        apply_rules(doc, &gui_rules(), ctx);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use emulauncher_core::{FeatureSet, Options};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_writes_prompts_and_keeps_geometry() {
        let dir = TempDir::new().unwrap();
        let path = gui_settings_path(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[main_window]\ngeometry=@ByteArray(x)\nconfirmationBoxExitGame=true\n").unwrap();

        let options = Options::new().with("discord", "1");
        let gate = FeatureSet::All;
        write_gui_settings(dir.path(), BindingContext::new(&options, &gate)).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "[main_window]\n\
             geometry=@ByteArray(x)\n\
             confirmationBoxExitGame=false\n\
             infoBoxEnabledInstallPUP=false\n\
             infoBoxEnabledWelcome=false\n\
             confirmationBoxBootGame=false\n\
             infoBoxEnabledInstallPKG=false\n\
             \n\
             [Meta]\n\
             checkUpdateStart=false\n\
             useRichPresence=true\n\
             \n\
             [GSFrame]\n\
             lockMouseInFullscreen=true\n\
             disableMouse=true\n"
        );
    }

    #[test]
    fn test_guns_unlock_mouse() {
        let dir = TempDir::new().unwrap();
        let options = Options::new().with("rpcs3_guns", "true");
        let gate = FeatureSet::none();
        write_gui_settings(dir.path(), BindingContext::new(&options, &gate)).unwrap();

        let text = fs::read_to_string(gui_settings_path(dir.path())).unwrap();
        assert!(text.contains("lockMouseInFullscreen=false\n"));
        assert!(text.contains("useRichPresence=false\n"));
    }
}
