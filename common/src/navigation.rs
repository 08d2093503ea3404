//! List/detail navigation state
//!
//! Both pages share the same two views. The router is a value: events
//! produce the next state and nothing else is mutated.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    #[default]
    ProductoTerminado,
    Despacho,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::ProductoTerminado => "Evaluación de Producto Terminado",
            Page::Despacho => "Programación de Despachos",
        }
    }

    pub const ALL: [Page; 2] = [Page::ProductoTerminado, Page::Despacho];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    #[default]
    List,
    Detail { fcl: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    SelectPage(Page),
    OpenDetail(String),
    Back,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Router {
    pub page: Page,
    pub view: View,
}

impl Router {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            view: View::List,
        }
    }

    /// Next state after `event`.
    ///
    /// Switching page always lands on its list. Opening a detail with a
    /// blank FCL is ignored.
    pub fn apply(&self, event: NavEvent) -> Router {
        match event {
            NavEvent::SelectPage(page) => Router::new(page),
            NavEvent::OpenDetail(fcl) => {
                let fcl = fcl.trim();
                if fcl.is_empty() {
                    return self.clone();
                }
                Router {
                    page: self.page,
                    view: View::Detail {
                        fcl: fcl.to_string(),
                    },
                }
            }
            NavEvent::Back => Router::new(self.page),
        }
    }

    pub fn open_detail(&self, fcl: impl Into<String>) -> Router {
        self.apply(NavEvent::OpenDetail(fcl.into()))
    }

    pub fn back(&self) -> Router {
        self.apply(NavEvent::Back)
    }

    /// FCL of the open detail, if any.
    pub fn selected_fcl(&self) -> Option<&str> {
        match &self.view {
            View::Detail { fcl } => Some(fcl),
            View::List => None,
        }
    }

    pub fn is_detail(&self) -> bool {
        self.selected_fcl().is_some()
    }
}
