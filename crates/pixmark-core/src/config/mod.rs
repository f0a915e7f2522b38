//! Output settings: where and how captures are written.

mod store;

pub use store::{ConfigStore, FileConfigStore, MemoryConfigStore};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Settings file {} does not hold a JSON object", .0.display())]
    NotAnObject(PathBuf),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

pub const KEY_OUTPUT_DESTINATIONS: &str = "outputDestinations";
pub const KEY_ALLOW_OVERWRITE: &str = "allowOverwrite";
pub const KEY_FULL_PATH_OVERRIDE: &str = "fullPathOverride";
pub const KEY_COPY_PATH_TO_CLIPBOARD: &str = "copyPathToClipboard";
pub const KEY_FILENAME_PATTERN: &str = "filenamePattern";
pub const KEY_INCREMENTING_COUNTER: &str = "incrementingCounter";
pub const KEY_OUTPUT_PATH: &str = "outputPath";
pub const KEY_POST_PROCESS_COMMAND: &str = "postProcessCommand";
pub const KEY_POST_PROCESS_COMMAND_ARGS: &str = "postProcessCommandArgs";
pub const KEY_AUTO_REDUCE_COLORS: &str = "autoReduceColors";
pub const KEY_FILE_FORMAT: &str = "fileFormat";
pub const KEY_JPEG_QUALITY: &str = "jpegQuality";
pub const KEY_PROMPT_QUALITY: &str = "promptQuality";
pub const KEY_REDUCE_COLORS: &str = "reduceColors";
pub const KEY_REDUCE_COLORS_TARGET: &str = "reduceColorsTarget";

/// Image file format for written captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Bmp,
    Gif,
    Jpg,
    #[default]
    Png,
    Tiff,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Bmp,
        OutputFormat::Gif,
        OutputFormat::Jpg,
        OutputFormat::Png,
        OutputFormat::Tiff,
    ];

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Bmp => "bmp",
            OutputFormat::Gif => "gif",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Tiff => "tiff",
        }
    }

    /// Parse a file extension, case-insensitively. Accepts `jpeg` and `tif`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "bmp" => Some(OutputFormat::Bmp),
            "gif" => Some(OutputFormat::Gif),
            "jpg" | "jpeg" => Some(OutputFormat::Jpg),
            "png" => Some(OutputFormat::Png),
            "tif" | "tiff" => Some(OutputFormat::Tiff),
            _ => None,
        }
    }
}

/// Name, description and default of one setting.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDescriptor {
    pub key: &'static str,
    pub description: &'static str,
    pub default: Value,
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputConfig {
    pub output_destinations: Vec<String>,
    pub allow_overwrite: bool,
    pub full_path_override: String,
    pub copy_path_to_clipboard: bool,
    pub filename_pattern: String,
    pub incrementing_counter: u32,
    pub output_path: String,
    pub post_process_command: String,
    pub post_process_command_args: String,
    pub auto_reduce_colors: bool,
    pub file_format: OutputFormat,
    pub jpeg_quality: i32,
    pub prompt_quality: bool,
    pub reduce_colors: bool,
    pub reduce_colors_target: i32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_destinations: vec!["Picker".to_string()],
            allow_overwrite: true,
            full_path_override: String::new(),
            copy_path_to_clipboard: true,
            filename_pattern: r#"${capturetime:d"yyyy-MM-dd HH_mm_ss"}-${title}"#.to_string(),
            incrementing_counter: 1,
            output_path: String::new(),
            post_process_command: String::new(),
            post_process_command_args: "\"{0}\"".to_string(),
            auto_reduce_colors: false,
            file_format: OutputFormat::Png,
            jpeg_quality: 80,
            prompt_quality: false,
            reduce_colors: false,
            reduce_colors_target: 256,
        }
    }
}

fn read<T: DeserializeOwned>(store: &dyn ConfigStore, key: &str, default: T) -> ConfigResult<T> {
    let Some(value) = store.get(key)? else {
        return Ok(default);
    };
    match serde_json::from_value(value) {
        Ok(v) => Ok(v),
        Err(e) => {
            log::warn!("Ignoring setting {}: {}", key, e);
            Ok(default)
        }
    }
}

fn write<T: Serialize>(store: &mut dyn ConfigStore, key: &str, value: &T) -> ConfigResult<()> {
    store.set(key, serde_json::to_value(value)?)
}

impl OutputConfig {
    /// All settings with their descriptions and defaults.
    pub fn schema() -> Vec<SettingDescriptor> {
        let d = Self::default();
        let entry = |key: &'static str, description: &'static str, default: Value| {
            SettingDescriptor {
                key,
                description,
                default,
            }
        };
        vec![
            entry(
                KEY_OUTPUT_DESTINATIONS,
                "Which destinations? Possible options (more might be added by plugins) are: \
                 Editor, FileDefault, FileWithDialog, Clipboard, Printer, EMail, Picker",
                json!(d.output_destinations),
            ),
            entry(
                KEY_ALLOW_OVERWRITE,
                "If the target file already exists True will make Pixmark always overwrite \
                 and False will display a 'Save-As' dialog.",
                json!(d.allow_overwrite),
            ),
            entry(
                KEY_FULL_PATH_OVERRIDE,
                "SaveAs Full path?",
                json!(d.full_path_override),
            ),
            entry(
                KEY_COPY_PATH_TO_CLIPBOARD,
                "When saving a screenshot, copy the path to the clipboard?",
                json!(d.copy_path_to_clipboard),
            ),
            entry(
                KEY_FILENAME_PATTERN,
                "Filename pattern for screenshot.",
                json!(d.filename_pattern),
            ),
            entry(
                KEY_INCREMENTING_COUNTER,
                "The number for the ${NUM} in the filename pattern, \
                 is increased automatically after each save.",
                json!(d.incrementing_counter),
            ),
            entry(KEY_OUTPUT_PATH, "Output file path.", json!(d.output_path)),
            entry(
                KEY_POST_PROCESS_COMMAND,
                "Optional command to execute on a temporary PNG file, the command should \
                 overwrite the file and Pixmark will read it back. \
                 Note: this command is also executed when uploading PNG's!",
                json!(d.post_process_command),
            ),
            entry(
                KEY_POST_PROCESS_COMMAND_ARGS,
                "Arguments for the optional command to execute on a PNG, {0} is replaced by \
                 the temp-filename from Pixmark. Note: Temp-file is deleted afterwards by Pixmark.",
                json!(d.post_process_command_args),
            ),
            entry(
                KEY_AUTO_REDUCE_COLORS,
                "If set to true the amount of colors is counted and if smaller than 256 \
                 the color reduction is automatically used.",
                json!(d.auto_reduce_colors),
            ),
            entry(
                KEY_FILE_FORMAT,
                "Default file type for writing screenshots. (bmp, gif, jpg, png, tiff)",
                json!(d.file_format),
            ),
            entry(
                KEY_JPEG_QUALITY,
                "JPEG file save quality in %.",
                json!(d.jpeg_quality),
            ),
            entry(
                KEY_PROMPT_QUALITY,
                "Ask for the quality before saving?",
                json!(d.prompt_quality),
            ),
            entry(
                KEY_REDUCE_COLORS,
                "If set to true, than the colors of the output file are reduced \
                 to 256 (8-bit) colors",
                json!(d.reduce_colors),
            ),
            entry(
                KEY_REDUCE_COLORS_TARGET,
                "Amount of colors to reduce to, when reducing",
                json!(d.reduce_colors_target),
            ),
        ]
    }

    /// Read every setting from `store`, falling back to the default for
    /// keys that are missing or hold a value of the wrong type.
    pub fn load(store: &dyn ConfigStore) -> ConfigResult<Self> {
        let d = Self::default();
        Ok(Self {
            output_destinations: read(store, KEY_OUTPUT_DESTINATIONS, d.output_destinations)?,
            allow_overwrite: read(store, KEY_ALLOW_OVERWRITE, d.allow_overwrite)?,
            full_path_override: read(store, KEY_FULL_PATH_OVERRIDE, d.full_path_override)?,
            copy_path_to_clipboard: read(
                store,
                KEY_COPY_PATH_TO_CLIPBOARD,
                d.copy_path_to_clipboard,
            )?,
            filename_pattern: read(store, KEY_FILENAME_PATTERN, d.filename_pattern)?,
            incrementing_counter: read(store, KEY_INCREMENTING_COUNTER, d.incrementing_counter)?,
            output_path: read(store, KEY_OUTPUT_PATH, d.output_path)?,
            post_process_command: read(
                store,
                KEY_POST_PROCESS_COMMAND,
                d.post_process_command,
            )?,
            post_process_command_args: read(
                store,
                KEY_POST_PROCESS_COMMAND_ARGS,
                d.post_process_command_args,
            )?,
            auto_reduce_colors: read(store, KEY_AUTO_REDUCE_COLORS, d.auto_reduce_colors)?,
            file_format: read(store, KEY_FILE_FORMAT, d.file_format)?,
            jpeg_quality: read(store, KEY_JPEG_QUALITY, d.jpeg_quality)?,
            prompt_quality: read(store, KEY_PROMPT_QUALITY, d.prompt_quality)?,
            reduce_colors: read(store, KEY_REDUCE_COLORS, d.reduce_colors)?,
            reduce_colors_target: read(store, KEY_REDUCE_COLORS_TARGET, d.reduce_colors_target)?,
        })
    }

    /// Write every setting to `store`.
    pub fn save(&self, store: &mut dyn ConfigStore) -> ConfigResult<()> {
        write(store, KEY_OUTPUT_DESTINATIONS, &self.output_destinations)?;
        write(store, KEY_ALLOW_OVERWRITE, &self.allow_overwrite)?;
        write(store, KEY_FULL_PATH_OVERRIDE, &self.full_path_override)?;
        write(store, KEY_COPY_PATH_TO_CLIPBOARD, &self.copy_path_to_clipboard)?;
        write(store, KEY_FILENAME_PATTERN, &self.filename_pattern)?;
        write(store, KEY_INCREMENTING_COUNTER, &self.incrementing_counter)?;
        write(store, KEY_OUTPUT_PATH, &self.output_path)?;
        write(store, KEY_POST_PROCESS_COMMAND, &self.post_process_command)?;
        write(store, KEY_POST_PROCESS_COMMAND_ARGS, &self.post_process_command_args)?;
        write(store, KEY_AUTO_REDUCE_COLORS, &self.auto_reduce_colors)?;
        write(store, KEY_FILE_FORMAT, &self.file_format)?;
        write(store, KEY_JPEG_QUALITY, &self.jpeg_quality)?;
        write(store, KEY_PROMPT_QUALITY, &self.prompt_quality)?;
        write(store, KEY_REDUCE_COLORS, &self.reduce_colors)?;
        write(store, KEY_REDUCE_COLORS_TARGET, &self.reduce_colors_target)?;
        log::debug!("Saved output settings");
        Ok(())
    }

    /// Hand out the current `${NUM}` counter and advance it.
    pub fn take_counter(&mut self) -> u32 {
        let current = self.incrementing_counter;
        self.incrementing_counter = current.wrapping_add(1);
        current
    }

    /// Directory captures are written to; `None` when unset.
    pub fn output_dir(&self) -> Option<PathBuf> {
        let trimmed = self.output_path.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }
}
