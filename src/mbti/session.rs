//! The state of one user session.
//!
//! A session owns its table and its selection. Nothing is shared between sessions.

use log::{debug, info};
use snafu::prelude::*;

use top_ranking::chart::build_spec;
use top_ranking::*;

use crate::mbti::io_common::{load_table, DataSource};
use crate::mbti::upload::UploadPrompt;
use crate::mbti::{BMbtiResult, MbtiResult, UnknownTypeSnafu, NO_DATA_MESSAGE};

/// What the user currently sees.
#[derive(PartialEq, Debug, Clone)]
pub enum Screen {
    /// There is no dataset yet: an upload prompt and an informational message.
    NoData { message: String },
    /// The dropdown of types, with the current selection, and the chart for it.
    Chart {
        choices: Vec<String>,
        selected: String,
        spec: ChartSpec,
    },
}

pub struct Session {
    source: DataSource,
    table: Option<Table>,
    fingerprint: Option<String>,
    selected: Option<String>,
    screen: Screen,
}

impl Session {
    pub fn new(source: DataSource) -> Session {
        Session {
            source,
            table: None,
            fingerprint: None,
            selected: None,
            screen: Screen::NoData {
                message: NO_DATA_MESSAGE.to_string(),
            },
        }
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// The fingerprint of the loaded table.
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Runs one interaction: a new choice of type, or `None` to keep the current one.
    ///
    /// The table is loaded on the first interaction that finds data, and reused after
    /// that. If the interaction fails, the previous screen stays current.
    pub fn interact(
        &mut self,
        prompt: &mut dyn UploadPrompt,
        choice: Option<&str>,
    ) -> BMbtiResult<&Screen> {
        if self.table.is_none() {
            if let Some(table) = load_table(&self.source, prompt)? {
                let fingerprint = table.fingerprint();
                info!(
                    "Session: loaded {} rows, fingerprint {}",
                    table.len(),
                    fingerprint
                );
                self.fingerprint = Some(fingerprint);
                self.table = Some(table);
            }
        }

        let table = match &self.table {
            Some(t) => t,
            None => {
                debug!("Session: no data");
                self.screen = Screen::NoData {
                    message: NO_DATA_MESSAGE.to_string(),
                };
                return Ok(&self.screen);
            }
        };

        let choices = available_types(table);
        let selected = pick_type(&choices, choice, self.selected.as_deref())?;
        let ranked = top_n(table, &selected, TOP_N).context(UnknownTypeSnafu {
            name: selected.as_str(),
        })?;
        let spec = build_spec(&ranked, &selected).context(UnknownTypeSnafu {
            name: selected.as_str(),
        })?;
        info!(
            "Session: {:?}: {:?}",
            selected,
            ranked.rows.iter().map(|r| r.id.as_str()).collect::<Vec<&str>>()
        );

        self.selected = Some(selected.clone());
        self.screen = Screen::Chart {
            choices,
            selected,
            spec,
        };
        Ok(&self.screen)
    }
}

fn pick_type(
    choices: &[String],
    choice: Option<&str>,
    previous: Option<&str>,
) -> MbtiResult<String> {
    match choice {
        Some(c) => Ok(c.to_string()),
        None => match select_type(choices, previous) {
            Some(s) => Ok(s),
            None => whatever!("The dataset has no personality type to choose from"),
        },
    }
}
