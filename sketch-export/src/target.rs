//! Code-generation target profiles.

use std::fmt;
use std::str::FromStr;

use sketch_core::{ElementType, SemanticTag};

use crate::error::ExportError;

/// The stack a blueprint is written for.
///
/// Targets change the component vocabulary and the closing prompt; the
/// structural content of the blueprint is identical for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExportTarget {
    /// React with Tailwind CSS and shadcn/ui.
    #[default]
    ReactTailwind,
    /// Plain semantic HTML and CSS.
    HtmlCss,
    /// Next.js App Router.
    Nextjs,
}

impl ExportTarget {
    /// All targets.
    pub const ALL: [Self; 3] = [Self::ReactTailwind, Self::HtmlCss, Self::Nextjs];

    /// Identifier accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReactTailwind => "react-tailwind",
            Self::HtmlCss => "html-css",
            Self::Nextjs => "nextjs",
        }
    }

    /// Display name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ReactTailwind => "React + Tailwind",
            Self::HtmlCss => "HTML + CSS",
            Self::Nextjs => "Next.js",
        }
    }

    /// Suggested implementation for an element kind under this target.
    #[must_use]
    pub const fn component_suggestion(self, kind: ElementType, tag: SemanticTag) -> &'static str {
        let destructive = matches!(tag, SemanticTag::DestructiveAction);
        match self {
            Self::HtmlCss => match kind {
                ElementType::Container => "<section>",
                ElementType::Heading => "<h1>–<h6>",
                ElementType::Body => "<p>",
                ElementType::Cta if destructive => "<button class=\"destructive\">",
                ElementType::Cta => "<button>",
                ElementType::Textfield => "<input type=\"text\">",
                ElementType::Image => "<figure> + <img>",
                ElementType::Card => "<article>",
                ElementType::Topnav => "<nav>",
                ElementType::Tabbar => "<nav role=\"tablist\">",
                ElementType::Bottomsheet => "<dialog> or <div role=\"dialog\">",
                ElementType::List => "<ul> or <ol>",
            },
            Self::ReactTailwind | Self::Nextjs => match kind {
                ElementType::Container => "div with flex/grid layout",
                ElementType::Heading => "h1–h6 with text-xl/2xl/3xl",
                ElementType::Body => "p with text-sm/base",
                ElementType::Cta if destructive => "shadcn/ui Button variant=\"destructive\"",
                ElementType::Cta => "shadcn/ui Button",
                ElementType::Textfield => "shadcn/ui Input",
                ElementType::Image => "next/image (Next.js) or <img>",
                ElementType::Card => "shadcn/ui Card",
                ElementType::Topnav => "shadcn/ui NavigationMenu",
                ElementType::Tabbar => "shadcn/ui Tabs",
                ElementType::Bottomsheet => "shadcn/ui Sheet or Dialog",
                ElementType::List => "map() with shadcn/ui Separator between items",
            },
        }
    }

    /// Closing instructions for the code generator.
    #[must_use]
    pub const fn instructions(self) -> &'static str {
        match self {
            Self::ReactTailwind => REACT_TAILWIND_INSTRUCTIONS,
            Self::HtmlCss => HTML_CSS_INSTRUCTIONS,
            Self::Nextjs => NEXTJS_INSTRUCTIONS,
        }
    }
}

impl fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExportTarget {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ExportError::UnknownTarget(s.to_string()))
    }
}

const REACT_TAILWIND_INSTRUCTIONS: &str = "\
Generate a complete React + Tailwind CSS application from the blueprint above.
- Use functional components with hooks
- Use Tailwind CSS utility classes for all styling
- Use shadcn/ui components where appropriate (see Suggested Components sections)
- Handle all screen states (default, empty, error, loading)
- Respect semantic labels (Primary CTA, Trust Signal, etc.) in styling decisions
- Use the element inventory for exact component structure — the ASCII art shows layout only
- Use the JSON element tree for precise positioning and nesting
- Follow the responsive breakpoint guidance for adaptive layout
- Mobile-first, responsive design
- Add ARIA labels and accessibility attributes
- Do not add features not described in the blueprint";

const HTML_CSS_INSTRUCTIONS: &str = "\
Generate semantic HTML5 + CSS from the blueprint above.
- Use semantic HTML elements (see Suggested Components sections)
- CSS with custom properties for theming
- Handle all screen states (default, empty, error, loading)
- Respect semantic labels in styling decisions
- Use the element inventory for exact component structure
- Use the JSON element tree for precise positioning and nesting
- Follow the responsive breakpoint guidance for adaptive layout
- Mobile-first, responsive design
- Add ARIA labels and accessibility attributes
- Do not add features not described in the blueprint";

const NEXTJS_INSTRUCTIONS: &str = "\
Generate a complete Next.js application using App Router from the blueprint above.
- Use Next.js 14 App Router with file-based routing
- Use Tailwind CSS utility classes for all styling
- Use shadcn/ui components where appropriate (see Suggested Components sections)
- Build navigation routing between all screens (see Navigation Flow)
- Handle all screen states (default, empty, error, loading)
- Respect semantic labels (Primary CTA, Trust Signal, etc.) in styling decisions
- Use the element inventory for exact component structure — the ASCII art shows layout only
- Use the JSON element tree for precise positioning and nesting
- Follow the responsive breakpoint guidance for adaptive layout
- Mobile-first, responsive design
- Use Server Components by default, Client Components only when needed
- Add ARIA labels and accessibility attributes
- Do not add features not described in the blueprint";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_targets() {
        assert_eq!("react-tailwind".parse(), Ok(ExportTarget::ReactTailwind));
        assert_eq!("HTML-CSS".parse(), Ok(ExportTarget::HtmlCss));
        assert_eq!(" nextjs ".parse(), Ok(ExportTarget::Nextjs));
        assert_eq!(
            "vue".parse::<ExportTarget>(),
            Err(ExportError::UnknownTarget("vue".to_string()))
        );
    }

    #[test]
    fn test_default_and_display() {
        assert_eq!(ExportTarget::default(), ExportTarget::ReactTailwind);
        assert_eq!(ExportTarget::Nextjs.to_string(), "Next.js");
        for target in ExportTarget::ALL {
            assert_eq!(target.as_str().parse(), Ok(target));
        }
    }

    #[test]
    fn test_destructive_button_suggestion() {
        let html = ExportTarget::HtmlCss;
        assert_eq!(
            html.component_suggestion(ElementType::Cta, SemanticTag::DestructiveAction),
            "<button class=\"destructive\">"
        );
        assert_eq!(
            html.component_suggestion(ElementType::Cta, SemanticTag::PrimaryCta),
            "<button>"
        );
        assert_eq!(
            ExportTarget::Nextjs.component_suggestion(ElementType::Card, SemanticTag::None),
            "shadcn/ui Card"
        );
    }

    #[test]
    fn test_only_nextjs_mentions_server_components() {
        for target in ExportTarget::ALL {
            let mentions = target.instructions().contains("Server Components");
            assert_eq!(mentions, target == ExportTarget::Nextjs);
            assert!(target.instructions().ends_with("described in the blueprint"));
        }
    }
}
