//! Callback payloads carried by inline buttons.
//!
//! The wire strings are short and stable (`view_20`, `export_csv`, ...)
//! because transports cap callback data length.

use numsift_core::document::ExportFormat;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Re-run the access gate and commit any staged list
    CheckJoins,
    /// Rotate the session id, keeping the list
    NewSeason,
    /// Open the export format menu
    Export,
    /// Export the active generation
    ExportAs(ExportFormat),
    /// Show a page starting at `offset`
    View { offset: usize, show_all: bool },
    /// Apply the next transform in the cycle
    Transform,
    Settings,
    ToggleShowAll,
    SetPerPage,
    BackToMenu,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CheckJoins => f.write_str("check_joins"),
            Self::NewSeason => f.write_str("new_season"),
            Self::Export => f.write_str("export"),
            Self::ExportAs(format) => write!(f, "export_{}", format.extension()),
            Self::View {
                offset,
                show_all: false,
            } => write!(f, "view_{offset}"),
            Self::View {
                offset,
                show_all: true,
            } => write!(f, "viewall_{offset}"),
            Self::Transform => f.write_str("transform"),
            Self::Settings => f.write_str("settings"),
            Self::ToggleShowAll => f.write_str("toggle_show_all"),
            Self::SetPerPage => f.write_str("set_per_page"),
            Self::BackToMenu => f.write_str("back_to_menu"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown callback data '{}'", self.0)
    }
}

impl std::error::Error for UnknownAction {}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownAction(data.to_string());
        let action = match data {
            "check_joins" => Self::CheckJoins,
            "new_season" => Self::NewSeason,
            "export" => Self::Export,
            "transform" => Self::Transform,
            "settings" => Self::Settings,
            "toggle_show_all" => Self::ToggleShowAll,
            "set_per_page" => Self::SetPerPage,
            "back_to_menu" => Self::BackToMenu,
            _ => {
                if let Some(ext) = data.strip_prefix("export_") {
                    Self::ExportAs(ExportFormat::from_extension(ext).ok_or_else(unknown)?)
                } else if let Some(offset) = data.strip_prefix("viewall_") {
                    Self::View {
                        offset: offset.parse().map_err(|_| unknown())?,
                        show_all: true,
                    }
                } else if let Some(offset) = data.strip_prefix("view_") {
                    Self::View {
                        offset: offset.parse().map_err(|_| unknown())?,
                        show_all: false,
                    }
                } else {
                    return Err(unknown());
                }
            }
        };
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_strings() {
        let cases = [
            ("check_joins", Action::CheckJoins),
            ("export_xlsx", Action::ExportAs(ExportFormat::Xlsx)),
            (
                "view_20",
                Action::View {
                    offset: 20,
                    show_all: false,
                },
            ),
            (
                "viewall_0",
                Action::View {
                    offset: 0,
                    show_all: true,
                },
            ),
            ("back_to_menu", Action::BackToMenu),
        ];
        for (wire, action) in cases {
            assert_eq!(wire.parse::<Action>().unwrap(), action);
            assert_eq!(action.to_string(), wire);
        }
    }

    #[test]
    fn test_unknown_data() {
        for data in ["", "view_", "view_-1", "viewall_x", "export_pdf", "launch"] {
            assert!(data.parse::<Action>().is_err(), "accepted {data:?}");
        }
    }
}
