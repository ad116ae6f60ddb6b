//! The configuration engine
//!
//! [`ConfigManager`] owns every [`Parameter`] of the catalog, the lines of
//! each loaded level file and the typed [`Setting`] derived from each raw
//! value. Levels cascade from GLOBAL to GAMELIST: loading a level reads its
//! file and continues with the next one, so the most specific file that
//! names a parameter supplies its value.
//!
//! The engine is single-threaded. Work finished on other threads reaches it
//! through [`marquee_core::UiQueue`].

use crate::backup::BackupSnapshot;
use crate::catalog::Catalog;
use crate::discovery::ListKind;
use crate::level_file::{format_commented_line, format_line, line_name, seed_header, LevelFile};
use crate::parameter::Parameter;
use crate::paths::{FrontendPaths, AGGREGATE_PLATFORM};
use crate::persistence::LevelFilePersistence;
use crate::selector::SelectorState;
use crate::value::{Setting, LAYOUT_TEST_BACKCOLOR};
use crate::{ConfigError, ConfigResult};
use chrono::Datelike;
use marquee_core::{
    AppError, AutostartMode, FontStyle, KeyCode, Level, ListType, Rgba, RunChain, SortType, TextAlign,
    UseMouse,
};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Entries per page of [`ConfigManager::parameter_dump`]
const DUMP_PAGE_SIZE: usize = 50;

const LAYOUT_TEST_MODE: &str = "layout_test_mode";

/// Resolves, loads and saves the level chain
#[derive(Debug, Clone)]
pub struct ConfigManager {
    paths: FrontendPaths,
    catalog: Arc<Catalog>,
    params: Vec<Parameter>,
    settings: Vec<Setting>,
    index: HashMap<String, usize>,
    pub(crate) level_files: [LevelFile; Level::COUNT],
    pub(crate) sources: [Option<PathBuf>; Level::COUNT],
    pub(crate) backup: Option<BackupSnapshot>,
    pub(crate) state: SelectorState,
}

#[derive(Serialize)]
struct ExportedParameter<'a> {
    #[serde(flatten)]
    parameter: &'a Parameter,
    file: Option<&'a Path>,
}

impl ConfigManager {
    /// Creates an engine holding catalog defaults; nothing is read yet
    pub fn new(paths: FrontendPaths, catalog: Arc<Catalog>) -> Self {
        let params: Vec<Parameter> = catalog
            .entries()
            .iter()
            .map(|e| Parameter::new(&e.name, e.level, e.default.clone(), e.optional))
            .collect();
        let index = params
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name().to_string(), i))
            .collect();
        let settings = catalog
            .entries()
            .iter()
            .map(|e| e.kind.map(&e.default, &e.default))
            .collect();

        let mut manager = Self {
            paths,
            catalog,
            params,
            settings,
            index,
            level_files: Default::default(),
            sources: Default::default(),
            backup: None,
            state: SelectorState::Normal,
        };
        manager.apply_all();
        manager.fix_missing_params();
        manager
    }

    /// Creates an engine over `root` with the built-in catalog
    pub fn with_builtin_catalog(root: impl Into<PathBuf>) -> ConfigResult<Self> {
        let catalog = Catalog::builtin()?;
        Ok(Self::new(FrontendPaths::new(root), Arc::new(catalog)))
    }

    /// A fresh engine over the same root and catalog
    pub fn fresh(&self) -> Self {
        Self::new(self.paths.clone(), Arc::clone(&self.catalog))
    }

    pub fn paths(&self) -> &FrontendPaths {
        &self.paths
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.index.get(&name.trim().to_lowercase()).copied()
    }

    /// Looks a parameter up by case-insensitive name
    pub fn get_parameter(&self, name: &str) -> Option<&Parameter> {
        self.position(name).map(|i| &self.params[i])
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Sets a parameter's value without moving it to another level
    ///
    /// The value is trimmed and must fit on one line. Returns whether the
    /// value changed.
    pub fn set_parameter(&mut self, name: &str, value: &str) -> ConfigResult<bool> {
        let i = self
            .position(name)
            .ok_or_else(|| ConfigError::UnknownParameter {
                name: name.to_string(),
            })?;
        if value.trim().contains(['\n', '\r']) {
            return Err(ConfigError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
                reason: "values cannot span several lines".to_string(),
            });
        }
        Ok(self.set_at(i, value))
    }

    /// Like [`set_parameter`](Self::set_parameter) for names the engine
    /// itself relies on; a catalog without them only logs
    pub(crate) fn set_known(&mut self, name: &str, value: &str) -> bool {
        match self.position(name) {
            Some(i) => self.set_at(i, value),
            None => {
                log::warn!("Catalog has no '{}' parameter", name);
                false
            }
        }
    }

    fn set_at(&mut self, i: usize, value: &str) -> bool {
        let changed = self.params[i].set_value(value.trim());
        self.apply(i);
        changed
    }

    /// Pins a parameter to the level whose file should hold it
    pub fn set_parameter_level(&mut self, name: &str, level: Level) -> ConfigResult<()> {
        let i = self
            .position(name)
            .ok_or_else(|| ConfigError::UnknownParameter {
                name: name.to_string(),
            })?;
        self.params[i].set_current_level(level);
        Ok(())
    }

    pub(crate) fn pin_level(&mut self, name: &str, level: Level) {
        if let Some(i) = self.position(name) {
            self.params[i].set_current_level(level);
        }
    }

    // ---- typed access -------------------------------------------------

    /// Typed value of a parameter as last applied
    pub fn setting(&self, name: &str) -> Option<&Setting> {
        self.position(name).map(|i| &self.settings[i])
    }

    /// Raw value; unknown names read as empty
    pub fn get_str(&self, name: &str) -> &str {
        self.get_parameter(name).map(Parameter::value).unwrap_or("")
    }

    pub fn get_bool(&self, name: &str) -> bool {
        self.setting(name)
            .and_then(Setting::as_bool)
            .unwrap_or(false)
    }

    pub fn get_int(&self, name: &str) -> i32 {
        self.setting(name).and_then(Setting::as_int).unwrap_or(0)
    }

    pub fn get_float(&self, name: &str) -> f32 {
        self.setting(name).and_then(Setting::as_float).unwrap_or(0.0)
    }

    pub fn get_color(&self, name: &str) -> Rgba {
        self.setting(name)
            .and_then(Setting::as_color)
            .unwrap_or_default()
    }

    pub fn get_key(&self, name: &str) -> KeyCode {
        self.setting(name).and_then(Setting::as_key).unwrap_or_default()
    }

    pub fn get_font_style(&self, name: &str) -> FontStyle {
        self.setting(name)
            .and_then(Setting::as_font_style)
            .unwrap_or_default()
    }

    pub fn get_text_align(&self, name: &str) -> TextAlign {
        self.setting(name)
            .and_then(Setting::as_text_align)
            .unwrap_or_default()
    }

    pub fn current_platform(&self) -> &str {
        self.get_str("current_platform")
    }

    pub fn current_emulator(&self) -> &str {
        self.get_str("current_emulator")
    }

    pub fn current_gamelist(&self) -> &str {
        self.get_str("current_gamelist")
    }

    pub fn current_layout(&self) -> &str {
        self.get_str("current_layout")
    }

    pub fn current_game(&self) -> &str {
        self.get_str("current_game")
    }

    /// True while the synthetic all-platforms list is selected
    pub fn is_aggregate(&self) -> bool {
        self.current_platform() == AGGREGATE_PLATFORM
    }

    pub fn layout_test_mode(&self) -> bool {
        self.get_bool(LAYOUT_TEST_MODE)
    }

    pub fn list_type(&self) -> ListType {
        match self.setting("list_type") {
            Some(Setting::ListType(t)) => *t,
            _ => ListType::default(),
        }
    }

    pub fn current_sort(&self) -> SortType {
        match self.setting("current_sort") {
            Some(Setting::SortType(s)) => *s,
            _ => SortType::default(),
        }
    }

    pub fn autostart_mode(&self) -> AutostartMode {
        match self.setting("autostart_mode") {
            Some(Setting::Autostart(a)) => *a,
            _ => AutostartMode::default(),
        }
    }

    pub fn use_mouse(&self) -> UseMouse {
        match self.setting("use_mouse") {
            Some(Setting::UseMouse(m)) => *m,
            _ => UseMouse::default(),
        }
    }

    pub fn last_game_played(&self) -> RunChain {
        RunChain::parse(self.get_str("last_game_played"))
    }

    // ---- applying -----------------------------------------------------

    /// Recomputes the typed setting of one parameter
    pub(crate) fn apply(&mut self, i: usize) {
        let entry = &self.catalog.entries()[i];
        let raw = if self.layout_test_mode() && entry.name.ends_with("_backcolor") {
            LAYOUT_TEST_BACKCOLOR
        } else {
            self.params[i].value()
        };
        self.settings[i] = entry.kind.map(raw, &entry.default);

        if entry.name == LAYOUT_TEST_MODE {
            self.apply_backcolors();
        }
    }

    fn apply_backcolors(&mut self) {
        let test_mode = self.layout_test_mode();
        for (i, entry) in self.catalog.entries().iter().enumerate() {
            if entry.name.ends_with("_backcolor") {
                let raw = if test_mode {
                    LAYOUT_TEST_BACKCOLOR
                } else {
                    self.params[i].value()
                };
                self.settings[i] = entry.kind.map(raw, &entry.default);
            }
        }
    }

    pub(crate) fn apply_all(&mut self) {
        for i in 0..self.params.len() {
            self.apply(i);
        }
    }

    // ---- resolution ---------------------------------------------------

    /// Re-resolves every parameter currently sourced from `level`
    ///
    /// A parameter declared at a less specific level takes the last value
    /// found in the nearest less specific level file; otherwise, or when
    /// declared at `level` itself, it returns to its default. Inherited
    /// values are never marked changed.
    pub fn restore_level_values(&mut self, level: Level) {
        for i in 0..self.params.len() {
            if self.params[i].current_level() != level {
                continue;
            }
            let inherited = if self.params[i].default_level() < level {
                let name = self.params[i].name();
                level.less_specific().find_map(|candidate| {
                    self.level_files[candidate.index()]
                        .find_last(name)
                        .map(|value| (candidate, value.to_string()))
                })
            } else {
                None
            };

            match inherited {
                Some((found_at, value)) => self.params[i].adopt(found_at, value),
                None => self.params[i].restore(),
            }
            self.apply(i);
        }
    }

    // ---- loading ------------------------------------------------------

    /// Loads `level` and every chained level after it
    ///
    /// Returns `Ok(false)` when a level's file name cannot be determined;
    /// levels already read stay loaded.
    pub fn load_config(&mut self, level: Level) -> ConfigResult<bool> {
        self.load_chain(level, None)
    }

    /// Loads `level` from an explicit file, then the chained levels after it
    pub fn load_config_from(&mut self, level: Level, path: &Path) -> ConfigResult<bool> {
        self.load_chain(level, Some(path.to_path_buf()))
    }

    fn load_chain(&mut self, start: Level, explicit: Option<PathBuf>) -> ConfigResult<bool> {
        let mut level = start;
        let mut explicit = explicit;
        loop {
            let path = match explicit.take() {
                Some(path) => path,
                None => match self.file_name_from_level(level)? {
                    Some(path) => path,
                    None => {
                        log::warn!("No file name for the {} level, load aborted", level);
                        return Ok(false);
                    }
                },
            };
            self.load_level_file(level, &path)?;

            match level.next() {
                Some(next) if level < Level::MAX_CHAINED && !self.is_aggregate() => level = next,
                _ => break,
            }
        }
        self.fix_missing_params();
        Ok(true)
    }

    fn load_level_file(&mut self, level: Level, path: &Path) -> ConfigResult<()> {
        let persistence = LevelFilePersistence::new(path.to_path_buf());
        if !persistence.exists() {
            self.seed_level_file(level, &persistence)?;
        }

        let file = persistence.load(|name| self.index.contains_key(name))?;
        for (name, value) in file.entries() {
            if let Some(&i) = self.index.get(name) {
                log::debug!("{} ({}) = {}", name, level, value);
                self.params[i].adopt(level, value);
                self.apply(i);
            }
        }

        log::info!("Loaded {} level from {}", level, path.display());
        self.level_files[level.index()] = file;
        self.sources[level.index()] = Some(path.to_path_buf());
        Ok(())
    }

    /// Creates a missing level file listing the parameters declared there
    fn seed_level_file(
        &self,
        level: Level,
        persistence: &LevelFilePersistence,
    ) -> ConfigResult<()> {
        let mut lines = seed_header(level, chrono::Local::now().year());
        lines.extend(
            self.params
                .iter()
                .filter(|p| p.default_level() == level)
                .map(|p| format_line(p.name(), p.value())),
        );
        persistence.save(&LevelFile::from_lines(lines))?;
        log::info!(
            "Created {} level file {}",
            level,
            persistence.path().display()
        );
        Ok(())
    }

    // ---- saving -------------------------------------------------------

    /// True when some parameter sourced from `level` is changed or absent
    /// from the level's lines
    ///
    /// An optional parameter documented as a commented line counts as
    /// present.
    pub fn is_level_changed(&self, level: Level) -> bool {
        let file = &self.level_files[level.index()];
        self.params
            .iter()
            .filter(|p| p.current_level() == level)
            .any(|p| {
                p.is_changed()
                    || !(file.contains(p.name())
                        || (p.is_optional() && file.contains_commented(p.name())))
            })
    }

    /// Writes every level that needs it
    ///
    /// Existing lines keep their place and text unless they hold a changed
    /// parameter of that level. Parameters with no line are appended, the
    /// optional unchanged ones commented out.
    pub fn save_config(&mut self) -> ConfigResult<()> {
        let last = if self.is_aggregate() {
            Level::Platform
        } else {
            Level::Layout
        };

        for level in Level::ALL.into_iter().filter(|l| *l <= last) {
            if !self.is_level_changed(level) {
                continue;
            }
            let Some(path) = self.file_name_from_level(level)? else {
                log::warn!("No file name for the {} level, not saved", level);
                continue;
            };

            let file = self.render_level(level);
            LevelFilePersistence::new(path.clone()).save(&file)?;
            log::info!("Saved {} level to {}", level, path.display());

            self.level_files[level.index()] = file;
            self.sources[level.index()] = Some(path);
            for param in self.params.iter_mut().filter(|p| p.current_level() == level) {
                param.mark_saved();
            }
        }
        Ok(())
    }

    fn render_level(&self, level: Level) -> LevelFile {
        let current = &self.level_files[level.index()];
        let mut lines: Vec<String> = current
            .lines()
            .iter()
            .map(|line| {
                let changed_here = line_name(line)
                    .and_then(|name| self.index.get(name))
                    .map(|&i| &self.params[i])
                    .filter(|p| p.current_level() == level && p.is_changed());
                match changed_here {
                    Some(p) => format_line(p.name(), p.value()),
                    None => line.clone(),
                }
            })
            .collect();

        let mut first_missing = true;
        for p in self.params.iter().filter(|p| p.current_level() == level) {
            if current.contains(p.name()) {
                continue;
            }
            if current.contains_commented(p.name()) && !p.is_changed() && p.is_optional() {
                continue;
            }
            if first_missing {
                lines.push(String::new());
                first_missing = false;
            }
            if p.is_changed() || !p.is_optional() {
                lines.push(format_line(p.name(), p.value()));
            } else {
                lines.push(format_commented_line(p.name(), p.value()));
            }
        }
        LevelFile::from_lines(lines)
    }

    // ---- files --------------------------------------------------------

    /// Lines of a level as last loaded or saved
    pub fn level_file(&self, level: Level) -> &LevelFile {
        &self.level_files[level.index()]
    }

    /// Files read or written so far, by level
    pub fn loaded_files(&self) -> Vec<(Level, &Path)> {
        Level::ALL
            .iter()
            .filter_map(|&level| {
                self.sources[level.index()]
                    .as_deref()
                    .map(|path| (level, path))
            })
            .collect()
    }

    /// File backing `level` under the current selectors
    ///
    /// Missing platform, emulator or gamelist selectors are filled by
    /// discovery, then by built-in fallbacks that are used for the path but
    /// not stored as the selector. `None` when there is no layout or no
    /// current game.
    pub fn file_name_from_level(&mut self, level: Level) -> ConfigResult<Option<PathBuf>> {
        if self.is_aggregate() && level.is_chained() && level != Level::Global {
            return Ok(Some(self.paths.aggregate_file()));
        }

        let path = match level {
            Level::Global => Some(self.paths.global_file()),
            Level::Platform => {
                let platform = self.platform_or_fallback()?;
                Some(self.paths.platform_file(&platform))
            }
            Level::Emulator => {
                let platform = self.platform_or_fallback()?;
                let emulator = self.emulator_or_fallback(&platform)?;
                Some(self.paths.emulator_file(&platform, &emulator))
            }
            Level::Gamelist => {
                let platform = self.platform_or_fallback()?;
                let emulator = self.emulator_or_fallback(&platform)?;
                let gamelist = self.gamelist_or_fallback(&platform, &emulator)?;
                Some(self.paths.gamelist_file(&platform, &emulator, &gamelist))
            }
            Level::Layout => {
                let layout = self.current_layout();
                (!layout.is_empty()).then(|| self.paths.layout_file(layout))
            }
            Level::Item => {
                if self.current_game().is_empty() {
                    None
                } else {
                    let platform = self.platform_or_fallback()?;
                    let emulator = self.emulator_or_fallback(&platform)?;
                    Some(
                        self.paths
                            .item_file(&platform, &emulator, self.current_game()),
                    )
                }
            }
        };
        Ok(path)
    }

    /// File currently supplying a parameter's value
    pub fn file_name_from_param(&mut self, name: &str) -> ConfigResult<Option<PathBuf>> {
        match self.get_parameter(name).map(Parameter::current_level) {
            Some(level) => self.file_name_from_level(level),
            None => Ok(None),
        }
    }

    /// The first of `levels` that has no file under the current selectors
    ///
    /// Reported as [`AppError::UnresolvedFileName`] naming the selector the
    /// user should check.
    pub fn unresolved_file_name(
        &mut self,
        levels: impl IntoIterator<Item = Level>,
    ) -> ConfigResult<Option<AppError>> {
        for level in levels {
            if self.file_name_from_level(level)?.is_none() {
                return Ok(Some(AppError::UnresolvedFileName {
                    level: level.to_string(),
                    parameter: selector_param(level).to_string(),
                }));
            }
        }
        Ok(None)
    }

    fn platform_or_fallback(&mut self) -> ConfigResult<String> {
        if self.current_platform().is_empty() {
            self.discover_list_under(ListKind::Platforms, "", "")?;
        }
        let platform = self.current_platform().to_string();
        if !platform.is_empty() {
            return Ok(platform);
        }
        warn_missing_selector("platform");
        self.set_known("platform_list", "arcade");
        self.set_known("platform_title", "Arcade");
        Ok("arcade".to_string())
    }

    fn emulator_or_fallback(&mut self, platform: &str) -> ConfigResult<String> {
        if self.current_emulator().is_empty() {
            self.discover_list_under(ListKind::Emulators, platform, "")?;
        }
        let emulator = self.current_emulator().to_string();
        if !emulator.is_empty() {
            return Ok(emulator);
        }
        warn_missing_selector("emulator");
        self.set_known("emulator_list", "mame");
        self.set_known("emulator_title", "M.A.M.E.");
        Ok("mame".to_string())
    }

    fn gamelist_or_fallback(&mut self, platform: &str, emulator: &str) -> ConfigResult<String> {
        if self.current_gamelist().is_empty() {
            self.discover_list_under(ListKind::Gamelists, platform, emulator)?;
        }
        let gamelist = self.current_gamelist().to_string();
        if !gamelist.is_empty() {
            return Ok(gamelist);
        }
        warn_missing_selector("gamelist");
        let fallback = format!("{}-0", emulator);
        self.set_known("gamelist_list", &fallback);
        self.set_known("gamelist_title", "All Games");
        Ok(fallback)
    }

    // ---- reporting ----------------------------------------------------

    /// Every parameter as `name (LEVEL) = value`, grouped by level
    ///
    /// Each level's group starts with the level name. Groups longer than
    /// the page size are split into several pages.
    pub fn parameter_dump(&self) -> Vec<String> {
        let mut pages = Vec::new();
        for level in Level::ALL {
            let mut page = format!("{}\n", level);
            let mut count = 0;
            for p in self.params.iter().filter(|p| p.current_level() == level) {
                page.push_str(&format!("{} ({}) = {}\n", p.name(), level, p.value()));
                count += 1;
                if count == DUMP_PAGE_SIZE {
                    pages.push(std::mem::take(&mut page));
                    count = 0;
                }
            }
            if count > 0 {
                pages.push(page);
            }
        }
        pages
    }

    /// Parameters with their source files as pretty JSON
    pub fn export_json(&self) -> ConfigResult<String> {
        let exported: Vec<ExportedParameter<'_>> = self
            .params
            .iter()
            .map(|p| ExportedParameter {
                parameter: p,
                file: self.sources[p.current_level().index()].as_deref(),
            })
            .collect();
        Ok(serde_json::to_string_pretty(&exported)?)
    }

    pub(crate) fn replace_state(
        &mut self,
        params: Vec<Parameter>,
        level_files: [LevelFile; Level::COUNT],
        sources: [Option<PathBuf>; Level::COUNT],
    ) {
        self.params = params;
        self.level_files = level_files;
        self.sources = sources;
        self.apply_all();
    }
}

fn warn_missing_selector(selector: &str) {
    let err = AppError::MissingSelector {
        selector: selector.to_string(),
    };
    log::warn!("{} {}", err, err.user_message());
}

/// Selector parameter that decides the file of a level
fn selector_param(level: Level) -> &'static str {
    match level {
        Level::Global | Level::Platform => "current_platform",
        Level::Emulator => "current_emulator",
        Level::Gamelist => "current_gamelist",
        Level::Layout => "current_layout",
        Level::Item => "current_game",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ConfigManager) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let manager =
            ConfigManager::with_builtin_catalog(temp_dir.path()).expect("Should build engine");
        (temp_dir, manager)
    }

    fn write(root: &Path, relative: &str, text: &str) {
        let path = root.join(relative);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).expect("Should create dirs");
        }
        fs::write(path, text).expect("Should write file");
    }

    #[test]
    fn test_new_engine_holds_defaults() {
        let (_temp_dir, manager) = setup();
        let rate = manager
            .get_parameter("keyboard_scroll_rate")
            .expect("Should exist");
        assert!(rate.is_default());
        assert_eq!(manager.get_int("keyboard_scroll_rate"), 225);
        assert_eq!(manager.current_platform(), "arcade");
    }

    #[test]
    fn test_get_parameter_is_case_insensitive() {
        let (_temp_dir, manager) = setup();
        assert!(manager.get_parameter("  ROM_Path ").is_some());
        assert!(manager.get_parameter("no_such_thing").is_none());
        assert_eq!(manager.get_str("no_such_thing"), "");
    }

    #[test]
    fn test_set_parameter_trims_and_keeps_level() {
        let (_temp_dir, mut manager) = setup();
        let changed = manager
            .set_parameter("screen_res_x", "  800 ")
            .expect("Should set");
        assert!(changed);

        let p = manager.get_parameter("screen_res_x").expect("Should exist");
        assert_eq!(p.value(), "800");
        assert_eq!(p.current_level(), Level::Layout);
        assert!(p.is_changed());
        assert_eq!(manager.get_int("screen_res_x"), 800);
    }

    #[test]
    fn test_set_unknown_parameter_fails() {
        let (_temp_dir, mut manager) = setup();
        let result = manager.set_parameter("bogus", "1");
        assert!(matches!(result, Err(ConfigError::UnknownParameter { .. })));
    }

    #[test]
    fn test_layout_test_mode_overrides_backcolors() {
        let (_temp_dir, mut manager) = setup();
        let normal = manager.get_color("menu_backcolor");

        manager
            .set_parameter("layout_test_mode", "1")
            .expect("Should set");
        assert_eq!(manager.get_color("menu_backcolor"), Rgba::new(200, 64, 200, 150));
        assert_eq!(manager.get_str("menu_backcolor"), "96, 64, 96");

        manager
            .set_parameter("layout_test_mode", "0")
            .expect("Should set");
        assert_eq!(manager.get_color("menu_backcolor"), normal);
    }

    #[test]
    fn test_unresolved_file_name_names_selector() {
        let (_temp_dir, mut manager) = setup();
        manager.load_config(Level::Global).expect("Should load");
        assert!(manager
            .unresolved_file_name(Level::ALL.into_iter().filter(|l| *l <= Level::Layout))
            .expect("Should check")
            .is_none());

        manager
            .set_parameter("current_layout", "")
            .expect("Should set");
        let err = manager
            .unresolved_file_name([Level::Global, Level::Layout, Level::Item])
            .expect("Should check")
            .expect("Layout should be unresolved");
        assert!(matches!(
            &err,
            AppError::UnresolvedFileName { level, parameter }
                if level == "LAYOUT" && parameter == "current_layout"
        ));
        assert!(err.user_message().contains("current_layout"));
    }

    #[test]
    fn test_unresolved_item_names_current_game() {
        let (_temp_dir, mut manager) = setup();
        manager.load_config(Level::Global).expect("Should load");

        let err = manager
            .unresolved_file_name([Level::Item])
            .expect("Should check")
            .expect("Item should be unresolved");
        assert!(matches!(
            err,
            AppError::UnresolvedFileName { parameter, .. } if parameter == "current_game"
        ));
    }

    #[test]
    fn test_multi_line_value_is_rejected() {
        let (_temp_dir, mut manager) = setup();
        let result = manager.set_parameter("keyboard_scroll_rate", "300\nrom_path /evil");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        assert_eq!(manager.get_str("keyboard_scroll_rate"), "225");
        assert!(manager
            .set_parameter("keyboard_scroll_rate", " 300\n")
            .expect("Trailing newline is trimmed"));
    }

    #[test]
    fn test_load_seeds_missing_files() {
        let (temp_dir, mut manager) = setup();
        assert!(manager.load_config(Level::Global).expect("Should load"));

        let global = temp_dir.path().join("config/feel.ini");
        let text = fs::read_to_string(&global).expect("GLOBAL file should exist");
        assert!(text.starts_with('#'));
        assert!(text.contains(&format_line("keyboard_scroll_rate", "225")));
        assert!(temp_dir
            .path()
            .join("config/arcade/mame/mame-0.ini")
            .exists());
    }

    #[test]
    fn test_load_adopts_values_without_marking_changed() {
        let (temp_dir, mut manager) = setup();
        write(temp_dir.path(), "config/feel.ini", "KEYBOARD_SCROLL_RATE\t\t300\n");

        manager.load_config(Level::Global).expect("Should load");
        let p = manager
            .get_parameter("keyboard_scroll_rate")
            .expect("Should exist");
        assert_eq!(p.value(), "300");
        assert_eq!(p.current_level(), Level::Global);
        assert!(!p.is_changed());
    }

    #[test]
    fn test_hash_value_reads_as_empty() {
        let (temp_dir, mut manager) = setup();
        write(
            temp_dir.path(),
            "config/arcade/mame/mame.ini",
            "emulator_path    #\n",
        );
        write(temp_dir.path(), "config/arcade/mame/mame-0.ini", "");
        manager
            .set_parameter("current_emulator", "mame")
            .expect("Should set");

        manager.load_config(Level::Emulator).expect("Should load");
        // fix_missing_params then derives it from the command line
        assert_eq!(manager.get_str("emulator_path"), "[emulator_path]");
    }

    #[test]
    fn test_more_specific_level_wins() {
        let (temp_dir, mut manager) = setup();
        write(temp_dir.path(), "config/feel.ini", "rom_path /global\n");
        write(
            temp_dir.path(),
            "config/arcade/mame/mame-0.ini",
            "rom_path /gamelist\n",
        );
        manager
            .set_parameter("current_emulator", "mame")
            .expect("Should set");

        manager.load_config(Level::Global).expect("Should load");
        let p = manager.get_parameter("rom_path").expect("Should exist");
        assert_eq!(p.value(), "/gamelist");
        assert_eq!(p.current_level(), Level::Gamelist);
    }

    #[test]
    fn test_restore_level_values_falls_back_to_nearest_ancestor() {
        let (temp_dir, mut manager) = setup();
        write(
            temp_dir.path(),
            "config/arcade/arcade.ini",
            "platform_title Arcade\nscreen_saver_slide_time 9\n",
        );
        write(
            temp_dir.path(),
            "config/arcade/mame/mame-0.ini",
            "screen_saver_slide_time 3\n",
        );
        manager
            .set_parameter("current_emulator", "mame")
            .expect("Should set");
        manager.load_config(Level::Global).expect("Should load");
        assert_eq!(manager.get_str("screen_saver_slide_time"), "3");

        manager.restore_level_values(Level::Gamelist);
        let p = manager
            .get_parameter("screen_saver_slide_time")
            .expect("Should exist");
        assert_eq!(p.value(), "9");
        assert_eq!(p.current_level(), Level::Platform);
        assert!(!p.is_changed());
    }

    #[test]
    fn test_restore_level_values_reverts_declared_parameters() {
        let (_temp_dir, mut manager) = setup();
        manager
            .set_parameter("screen_res_x", "1024")
            .expect("Should set");
        manager.restore_level_values(Level::Layout);

        let p = manager.get_parameter("screen_res_x").expect("Should exist");
        assert!(p.is_default());
        assert!(!p.is_changed());
    }

    #[test]
    fn test_unresolved_layout_returns_false() {
        let (_temp_dir, mut manager) = setup();
        manager
            .set_parameter("current_layout", "")
            .expect("Should set");
        assert!(!manager.load_config(Level::Layout).expect("Should not error"));
    }

    #[test]
    fn test_save_rewrites_changed_lines_in_place() {
        let (temp_dir, mut manager) = setup();
        write(
            temp_dir.path(),
            "config/feel.ini",
            "# my notes\nkeyboard_scroll_rate 300\nunknown_thing   stays\n",
        );
        manager.load_config(Level::Global).expect("Should load");
        manager
            .set_parameter("keyboard_scroll_rate", "150")
            .expect("Should set");
        manager.save_config().expect("Should save");

        let text = fs::read_to_string(temp_dir.path().join("config/feel.ini"))
            .expect("Should read");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# my notes");
        assert_eq!(lines[1], format_line("keyboard_scroll_rate", "150"));
        assert_eq!(lines[2], "unknown_thing   stays");
        assert!(!manager
            .get_parameter("keyboard_scroll_rate")
            .expect("Should exist")
            .is_changed());
    }

    #[test]
    fn test_save_appends_missing_parameters() {
        let (temp_dir, mut manager) = setup();
        write(temp_dir.path(), "config/feel.ini", "current_platform arcade\n");
        manager.load_config(Level::Global).expect("Should load");
        manager.save_config().expect("Should save");

        let text = fs::read_to_string(temp_dir.path().join("config/feel.ini"))
            .expect("Should read");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], format_line("current_platform", "arcade"));
        assert_eq!(lines[1], "");
        assert!(lines.contains(&format_commented_line("keyboard_scroll_rate", "225").as_str()));
        assert!(lines.contains(&format_line("last_game_played", "").as_str()));
        assert!(!manager.is_level_changed(Level::Global));
    }

    #[test]
    fn test_unchanged_complete_level_is_not_rewritten() {
        let (_temp_dir, mut manager) = setup();
        manager
            .set_parameter("current_emulator", "mame")
            .expect("Should set");
        manager
            .set_parameter("current_gamelist", "mame-0")
            .expect("Should set");
        manager.load_config(Level::Global).expect("Should load");
        manager.save_config().expect("Should save");
        for level in [Level::Global, Level::Platform, Level::Emulator, Level::Gamelist] {
            assert!(!manager.is_level_changed(level), "{} still dirty", level);
        }
    }

    #[test]
    fn test_aggregate_platform_collapses_chain() {
        let (temp_dir, mut manager) = setup();
        manager
            .set_parameter("current_platform", AGGREGATE_PLATFORM)
            .expect("Should set");
        for level in [Level::Platform, Level::Emulator, Level::Gamelist] {
            assert_eq!(
                manager.file_name_from_level(level).expect("Should resolve"),
                Some(temp_dir.path().join("config/all_emu.ini"))
            );
        }

        manager.load_config(Level::Platform).expect("Should load");
        assert!(manager.level_file(Level::Emulator).is_empty());
        assert!(manager.level_file(Level::Gamelist).is_empty());
        assert_eq!(manager.get_str("platform_title"), "* TOP GAMES *");
        assert_eq!(
            manager
                .get_parameter("current_layout")
                .expect("Should exist")
                .current_level(),
            Level::Platform
        );
    }

    #[test]
    fn test_missing_selectors_use_fallbacks() {
        let (temp_dir, mut manager) = setup();
        let path = manager
            .file_name_from_level(Level::Gamelist)
            .expect("Should resolve")
            .expect("Should have a path");
        assert_eq!(path, temp_dir.path().join("config/arcade/mame/mame-0.ini"));
        assert_eq!(manager.current_emulator(), "");
        assert_eq!(manager.get_str("emulator_title"), "M.A.M.E.");
        assert_eq!(manager.get_str("gamelist_title"), "All Games");
    }

    #[test]
    fn test_item_level_needs_a_game() {
        let (temp_dir, mut manager) = setup();
        assert_eq!(
            manager.file_name_from_level(Level::Item).expect("Should resolve"),
            None
        );
        manager
            .set_parameter("current_emulator", "mame")
            .expect("Should set");
        manager
            .set_parameter("current_game", "pacman")
            .expect("Should set");
        assert_eq!(
            manager.file_name_from_level(Level::Item).expect("Should resolve"),
            Some(temp_dir.path().join("config/arcade/mame/cfg/pacman.ini"))
        );
    }

    #[test]
    fn test_file_name_from_param() {
        let (temp_dir, mut manager) = setup();
        assert_eq!(
            manager
                .file_name_from_param("screen_res_x")
                .expect("Should resolve"),
            Some(temp_dir.path().join("layouts/sheet/layout.ini"))
        );
        assert_eq!(
            manager.file_name_from_param("bogus").expect("Should resolve"),
            None
        );
    }

    #[test]
    fn test_parameter_dump_pages() {
        let (_temp_dir, manager) = setup();
        let pages = manager.parameter_dump();
        assert!(pages[0].starts_with("GLOBAL\n"));
        assert!(pages
            .iter()
            .all(|page| page.lines().filter(|l| l.contains(" = ")).count() <= DUMP_PAGE_SIZE));
        let entries: usize = pages
            .iter()
            .map(|page| page.lines().filter(|l| l.contains(") = ")).count())
            .sum();
        assert_eq!(entries, manager.parameters().len());
        assert!(pages
            .iter()
            .any(|page| page.contains("keyboard_scroll_rate (GLOBAL) = 225\n")));
    }

    #[test]
    fn test_export_json() {
        let (_temp_dir, manager) = setup();
        let json = manager.export_json().expect("Should export");
        let value: serde_json::Value = serde_json::from_str(&json).expect("Should parse");
        let array = value.as_array().expect("Should be an array");
        assert_eq!(array.len(), manager.parameters().len());
        assert_eq!(array[0]["name"], "layout_test_mode");
    }
}
