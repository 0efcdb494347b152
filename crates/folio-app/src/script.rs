//! Editor scripts: a JSON list of user actions replayed against an editor.

use crate::AppError;
use folio_core::client::{MediaClient, UploadRequest};
use folio_core::layout::{DragMode, FreeLayout};
use folio_core::model::{ElementType, ElementUpdate};
use folio_core::reorder::{MoveDirection, SectionDirection};
use folio_core::Editor;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

fn default_container_size() -> Size {
    Size::new(800.0, 600.0)
}

/// A replayable editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Size given to image and video containers while editing them.
    #[serde(default = "default_container_size")]
    pub container_size: Size,
    pub steps: Vec<ScriptStep>,
}

/// A file named in an upload step. Only metadata is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptFile {
    pub filename: String,
    pub content_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl ScriptFile {
    fn into_request(self) -> UploadRequest {
        UploadRequest {
            title: self.title.unwrap_or_else(|| self.filename.clone()),
            filename: self.filename,
            content_type: self.content_type,
            bytes: Vec::new(),
            description: String::new(),
            category: self.category.unwrap_or_else(|| "Other".to_string()),
            date: None,
        }
    }
}

/// One user action. Element references are either an alias bound with
/// `as` or a literal element id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    AddElement {
        element_type: ElementType,
        #[serde(default, rename = "as")]
        alias: Option<String>,
    },
    SetProperty {
        target: String,
        property: String,
        value: Value,
    },
    SetContent {
        target: String,
        content: String,
    },
    Delete {
        target: String,
    },
    MoveToSection {
        target: String,
        direction: SectionDirection,
    },
    MoveSection {
        target: String,
        direction: MoveDirection,
    },
    Reorder {
        active: String,
        over: String,
    },
    Upload {
        files: Vec<ScriptFile>,
    },
    /// Place a library item, found by title, into a container.
    PlaceMedia {
        container: String,
        title: String,
    },
    AddText {
        container: String,
    },
    /// Drag the `item`-th tile of a container by `delta`.
    DragItem {
        container: String,
        item: usize,
        mode: DragMode,
        delta: Vec2,
    },
    ToggleCategory {
        category: String,
    },
    Save,
    Load,
    Clear,
}

/// Replays scripts, remembering aliases between steps.
pub struct ScriptRunner<'a, C: MediaClient> {
    editor: &'a mut Editor<C>,
    container_size: Size,
    aliases: HashMap<String, String>,
    statuses: Vec<String>,
}

impl<'a, C: MediaClient> ScriptRunner<'a, C> {
    pub fn new(editor: &'a mut Editor<C>) -> Self {
        Self {
            editor,
            container_size: default_container_size(),
            aliases: HashMap::new(),
            statuses: Vec::new(),
        }
    }

    /// Status messages shown so far, in order.
    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    fn resolve(&self, reference: &str) -> String {
        self.aliases
            .get(reference)
            .cloned()
            .unwrap_or_else(|| reference.to_string())
    }

    fn record_status(&mut self) {
        if let Some(status) = self.editor.status() {
            if self.statuses.last().map(String::as_str) != Some(status) {
                self.statuses.push(status.to_string());
            }
        }
    }

    fn container(&self, reference: &str) -> Result<FreeLayout, AppError> {
        let id = self.resolve(reference);
        self.editor
            .open_container(&id, self.container_size)
            .ok_or(AppError::NotAContainer(id))
    }

    pub async fn run(&mut self, script: Script) -> Result<(), AppError> {
        self.container_size = script.container_size;
        for (index, step) in script.steps.into_iter().enumerate() {
            log::debug!("Step {}: {:?}", index, step);
            self.step(step).await?;
            self.editor.apply_container_updates();
            self.record_status();
        }
        Ok(())
    }

    async fn step(&mut self, step: ScriptStep) -> Result<(), AppError> {
        match step {
            ScriptStep::AddElement { element_type, alias } => {
                let id = self
                    .editor
                    .add_element(element_type)
                    .ok_or_else(|| AppError::Rejected(format!("add {}", element_type.label())))?;
                if let Some(alias) = alias {
                    self.aliases.insert(alias, id);
                }
            }
            ScriptStep::SetProperty { target, property, value } => {
                let id = self.resolve(&target);
                if !self.editor.update_element_property(&id, &property, value) {
                    log::warn!("No element {} to update", id);
                }
            }
            ScriptStep::SetContent { target, content } => {
                let id = self.resolve(&target);
                if !self.editor.update_element(&id, ElementUpdate::content(content)) {
                    log::warn!("No element {} to update", id);
                }
            }
            ScriptStep::Delete { target } => {
                let id = self.resolve(&target);
                self.editor.delete_element(&id);
            }
            ScriptStep::MoveToSection { target, direction } => {
                let id = self.resolve(&target);
                if !self.editor.move_element_to_section(&id, direction) {
                    log::info!("{} cannot move {:?}", id, direction);
                }
            }
            ScriptStep::MoveSection { target, direction } => {
                let id = self.resolve(&target);
                if !self.editor.move_section(&id, direction) {
                    log::info!("Section {} cannot move {:?}", id, direction);
                }
            }
            ScriptStep::Reorder { active, over } => {
                let active = self.resolve(&active);
                let over = self.resolve(&over);
                if self.editor.begin_reorder(&active).is_none() {
                    return Err(AppError::Rejected(format!("reorder {}", active)));
                }
                self.editor.finish_reorder(Some(&over));
            }
            ScriptStep::Upload { files } => {
                let requests = files.into_iter().map(ScriptFile::into_request).collect();
                self.editor.upload_files(requests).await?;
            }
            ScriptStep::PlaceMedia { container, title } => {
                let media = self
                    .editor
                    .state()
                    .media
                    .iter()
                    .find(|item| item.title == title)
                    .cloned()
                    .ok_or(AppError::UnknownMedia(title))?;
                let mut layout = self.container(&container)?;
                if layout.add_media_item(&media).is_none() {
                    return Err(AppError::Rejected(format!(
                        "{} does not accept {}",
                        layout.container_id(),
                        media.title
                    )));
                }
            }
            ScriptStep::AddText { container } => {
                let mut layout = self.container(&container)?;
                layout.add_text_item();
            }
            ScriptStep::DragItem {
                container,
                item,
                mode,
                delta,
            } => {
                let mut layout = self.container(&container)?;
                let item_id = layout
                    .items()
                    .get(item)
                    .map(|item| item.id.clone())
                    .ok_or_else(|| AppError::Rejected(format!("no item {} in {}", item, container)))?;
                layout.begin_drag(&item_id, mode, Point::ZERO);
                layout.on_pointer_move(delta);
                layout.end_drag();
            }
            ScriptStep::ToggleCategory { category } => {
                self.editor.toggle_category(&category);
            }
            ScriptStep::Save => {
                self.editor.save_portfolio().await;
            }
            ScriptStep::Load => {
                self.editor.load_portfolio().await;
            }
            ScriptStep::Clear => {
                self.editor.clear_portfolio();
                self.aliases.clear();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::client::MemoryMediaClient;
    use folio_core::config::EditorConfig;
    use folio_core::model::GridItemType;
    use pollster::block_on;
    use std::sync::Arc;

    fn editor() -> Editor<MemoryMediaClient> {
        Editor::new(Arc::new(MemoryMediaClient::default()), EditorConfig::default())
    }

    fn script(json: &str) -> Script {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_steps() {
        let script = script(
            r#"{"steps":[
                {"op":"add_element","element_type":"text","as":"intro"},
                {"op":"move_section","target":"s","direction":"up"},
                {"op":"drag_item","container":"c","item":0,"mode":{"mode":"resize","handle":"se"},"delta":{"x":10,"y":5}},
                {"op":"save"}
            ]}"#,
        );
        assert_eq!(script.container_size, Size::new(800.0, 600.0));
        assert_eq!(script.steps.len(), 4);
        assert_eq!(
            script.steps[0],
            ScriptStep::AddElement {
                element_type: ElementType::Text,
                alias: Some("intro".into())
            }
        );
    }

    #[test]
    fn test_run_builds_layout() {
        let mut editor = editor();
        let mut runner = ScriptRunner::new(&mut editor);
        block_on(runner.run(script(
            r#"{"steps":[
                {"op":"add_element","element_type":"text","as":"intro"},
                {"op":"set_content","target":"intro","content":"Hello"},
                {"op":"add_element","element_type":"section","as":"second"},
                {"op":"move_to_section","target":"intro","direction":"next"},
                {"op":"save"}
            ]}"#,
        )))
        .unwrap();
        assert_eq!(runner.statuses(), ["No items to save"]);

        let layout = editor.layout();
        assert_eq!(layout.sections.len(), 2);
        let intro = &layout.children_of(1)[0];
        assert_eq!(intro.display_label(), "Hello");
    }

    #[test]
    fn test_run_places_media() {
        let mut editor = editor();
        let mut runner = ScriptRunner::new(&mut editor);
        block_on(runner.run(script(
            r#"{"steps":[
                {"op":"upload","files":[{"filename":"sunset.png","content_type":"image/png"}]},
                {"op":"add_element","element_type":"image","as":"gallery"},
                {"op":"place_media","container":"gallery","title":"sunset.png"},
                {"op":"add_text","container":"gallery"},
                {"op":"drag_item","container":"gallery","item":0,"mode":{"mode":"move"},"delta":{"x":41,"y":0}},
                {"op":"save"}
            ]}"#,
        )))
        .unwrap();
        assert_eq!(runner.statuses(), ["Portfolio saved successfully!"]);

        let gallery = &editor.layout().children_of(0)[0];
        let items = gallery.items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].item_type(), GridItemType::Image);
        assert_eq!(items[0].x, 60.0);
        assert_eq!(items[1].item_type(), GridItemType::Text);
    }

    #[test]
    fn test_video_container_refuses_image() {
        let mut editor = editor();
        let mut runner = ScriptRunner::new(&mut editor);
        let result = block_on(runner.run(script(
            r#"{"steps":[
                {"op":"upload","files":[{"filename":"a.png","content_type":"image/png","title":"A"}]},
                {"op":"add_element","element_type":"video","as":"reel"},
                {"op":"place_media","container":"reel","title":"A"}
            ]}"#,
        )));
        assert!(matches!(result, Err(AppError::Rejected(_))));
    }

    #[test]
    fn test_last_section_delete_reports_status() {
        let mut editor = editor();
        let section = editor.layout().sections[0].id.clone();
        let mut runner = ScriptRunner::new(&mut editor);
        block_on(runner.run(Script {
            container_size: default_container_size(),
            steps: vec![ScriptStep::Delete { target: section }],
        }))
        .unwrap();
        assert_eq!(
            runner.statuses(),
            ["You must have at least one section in your portfolio."]
        );
    }

    #[test]
    fn test_unknown_media() {
        let mut editor = editor();
        let mut runner = ScriptRunner::new(&mut editor);
        let result = block_on(runner.run(script(
            r#"{"steps":[
                {"op":"add_element","element_type":"image","as":"g"},
                {"op":"place_media","container":"g","title":"missing"}
            ]}"#,
        )));
        assert!(matches!(result, Err(AppError::UnknownMedia(title)) if title == "missing"));
    }
}
