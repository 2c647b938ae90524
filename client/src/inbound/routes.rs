//! Navigation targets.

use std::fmt;

use crate::domain::ConsultationId;

/// A screen the client can navigate to.
///
/// # Examples
/// ```
/// use conectahc::inbound::routes::Route;
///
/// assert_eq!(Route::resolve("/faq"), Route::Faq);
/// assert_eq!(Route::resolve("/nowhere"), Route::NotFound);
/// assert_eq!(Route::resolve("/edit/42").path(), "/edit/42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    AddConsultation,
    EditConsultation(ConsultationId),
    Team,
    About,
    Faq,
    Contact,
    NotFound,
}

impl Route {
    /// Resolve a path; anything unrecognised becomes [`Route::NotFound`].
    pub fn resolve(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Dashboard,
            "/login" => Self::Login,
            "/add" => Self::AddConsultation,
            "/integrantes" => Self::Team,
            "/about" => Self::About,
            "/faq" => Self::Faq,
            "/contato" => Self::Contact,
            "/404" => Self::NotFound,
            other => other
                .strip_prefix("/edit/")
                .filter(|id| !id.contains('/'))
                .and_then(|id| ConsultationId::new(id).ok())
                .map_or(Self::NotFound, Self::EditConsultation),
        }
    }

    /// Canonical path for this route.
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_owned(),
            Self::Dashboard => "/".to_owned(),
            Self::AddConsultation => "/add".to_owned(),
            Self::EditConsultation(id) => format!("/edit/{id}"),
            Self::Team => "/integrantes".to_owned(),
            Self::About => "/about".to_owned(),
            Self::Faq => "/faq".to_owned(),
            Self::Contact => "/contato".to_owned(),
            Self::NotFound => "/404".to_owned(),
        }
    }

    /// Whether the route requires an authenticated session.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Login | Self::NotFound)
    }

    /// Heading shown for the route.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "ConectaHC",
            Self::Dashboard => "Dashboard",
            Self::AddConsultation => "Nova Consulta",
            Self::EditConsultation(_) => "Editar Consulta",
            Self::Team => "Nossa Equipe",
            Self::About => "Sobre o ConectaHC",
            Self::Faq => "Perguntas Frequentes",
            Self::Contact => "Entre em Contato",
            Self::NotFound => "Página Não Encontrada",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
