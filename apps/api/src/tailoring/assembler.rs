//! Document Assembler — renders a `ResumeRecord` into a complete LaTeX document.
//!
//! Section order is fixed: heading, education, experience, projects, skills.
//! Every list section keeps its start/end markers even when it has no entries,
//! so the output structure never depends on the data. Rendering is total and
//! deterministic: the same record always yields the same bytes.

use crate::tailoring::latex::{LatexWriter, Segment};
use crate::tailoring::models::{EducationEntry, ExperienceEntry, ProjectEntry, ResumeRecord};

use Segment::{Markup as M, Text as T, Url as U};

/// Document class, packages and the resume macros the section renderers rely on.
const PREAMBLE: &str = r"\documentclass[letterpaper,11pt]{article}

\usepackage{fontawesome5}
\usepackage{latexsym}
\usepackage[empty]{fullpage}
\usepackage{titlesec}
\usepackage{marvosym}
\usepackage[usenames,dvipsnames]{color}
\usepackage{verbatim}
\usepackage{enumitem}
\usepackage[hidelinks]{hyperref}
\usepackage{fancyhdr}
\usepackage[english]{babel}
\usepackage{tabularx}
\usepackage[default]{lato}
\input{glyphtounicode}

\pagestyle{fancy}
\fancyhf{}
\fancyfoot{}
\renewcommand{\headrulewidth}{0pt}
\renewcommand{\footrulewidth}{0pt}

\addtolength{\oddsidemargin}{-0.5in}
\addtolength{\evensidemargin}{-0.5in}
\addtolength{\textwidth}{1in}
\addtolength{\topmargin}{-.5in}
\addtolength{\textheight}{1.0in}

\urlstyle{same}
\raggedbottom
\raggedright
\setlength{\tabcolsep}{0in}

\titleformat{\section}{
    \vspace{-4pt}\scshape\raggedright\large
}{}{0em}{}[\color{black}\titlerule\vspace{-5pt}]

\pdfgentounicode=1

\newcommand{\resumeItem}[1]{
    \item\small{
        {#1 \vspace{-2pt}}
    }
}

\newcommand{\resumeSubheading}[4]{
    \vspace{-2pt}\item
    \begin{tabular*}{0.97\textwidth}[t]{l@{\extracolsep{\fill}}r}
        \textbf{#1} & #2 \\
        \textit{\small#3} & \textit{\small #4} \\
    \end{tabular*}\vspace{-7pt}
}

\newcommand{\resumeProjectHeading}[2]{
    \item
    \begin{tabular*}{0.97\textwidth}{l@{\extracolsep{\fill}}r}
        \small#1 & #2 \\
    \end{tabular*}\vspace{-7pt}
}

\renewcommand\labelitemii{$\vcenter{\hbox{\tiny$\bullet$}}$}

\newcommand{\resumeSubHeadingListStart}{\begin{itemize}[leftmargin=0.15in, label={}]}
\newcommand{\resumeSubHeadingListEnd}{\end{itemize}}
\newcommand{\resumeItemListStart}{\begin{itemize}}
\newcommand{\resumeItemListEnd}{\end{itemize}\vspace{-5pt}}
\newcommand{\resumeNoEntries}{\item[]}

\definecolor{Black}{RGB}{0, 0, 0}
\newcommand{\seticon}[1]{\textcolor{Black}{\csname #1\endcsname}}

\begin{document}
";

const SKILL_SEPARATOR: &str = ", ";

/// Renders the full document.
pub fn render(resume: &ResumeRecord) -> String {
    let mut w = LatexWriter::new();
    w.raw(PREAMBLE).blank();

    render_heading(&mut w, resume);
    render_education(&mut w, resume.education().iter().map(|e| &**e));
    render_experience(&mut w, resume.experience().iter().map(|e| &**e));
    render_projects(&mut w, resume.projects().iter().map(|p| &**p));
    render_skills(&mut w, resume);

    w.markup(0, r"\end{document}");
    w.finish()
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

fn render_heading(w: &mut LatexWriter, resume: &ResumeRecord) {
    let id = resume.identity();

    w.markup(0, "%----------HEADING----------%");
    w.markup(0, r"\begin{center}");
    w.line(
        1,
        &[M(r"\textbf{\Huge \scshape "), T(&id.name), M(r"} \\ \vspace{1pt}")],
    );

    let mut contacts: Vec<Vec<Segment<'_>>> = Vec::new();
    if !id.phone.trim().is_empty() {
        contacts.push(vec![M(r"\seticon{faPhone} \ \small "), T(&id.phone)]);
    }
    if !id.email.trim().is_empty() {
        contacts.push(vec![
            M(r"\href{mailto:"),
            U(&id.email),
            M(r"}{\seticon{faEnvelope} \underline{"),
            T(&id.email),
            M("}}"),
        ]);
    }
    if !id.linkedin.trim().is_empty() {
        contacts.push(vec![
            M(r"\href{https://www.linkedin.com/in/"),
            U(&id.linkedin),
            M(r"}{\seticon{faLinkedin} \underline{linkedin.com/in/"),
            T(&id.linkedin),
            M("}}"),
        ]);
    }
    if !id.github.trim().is_empty() {
        contacts.push(vec![
            M(r"\href{https://github.com/"),
            U(&id.github),
            M(r"}{\seticon{faGithub} \underline{github.com/"),
            T(&id.github),
            M("}}"),
        ]);
    }

    let last = contacts.len().saturating_sub(1);
    for (i, mut contact) in contacts.into_iter().enumerate() {
        if i < last {
            contact.push(M(r" \quad"));
        }
        w.line(1, &contact);
    }

    w.markup(0, r"\end{center}");
    w.blank();
}

fn render_education<'a>(w: &mut LatexWriter, entries: impl Iterator<Item = &'a EducationEntry>) {
    open_list_section(w, "%-----------EDUCATION-----------%", r"\section{Education}");
    let mut any = false;
    for edu in entries {
        any = true;
        w.markup(2, r"\resumeSubheading");
        w.line(
            2,
            &[M("{"), T(&edu.institution), M("}{"), T(&edu.duration), M("}")],
        );
        if edu.grade.trim().is_empty() {
            w.line(2, &[M("{"), T(&edu.degree), M("}{}")]);
        } else {
            w.line(
                2,
                &[M("{"), T(&edu.degree), M("}{GPA: "), T(&edu.grade), M("}")],
            );
        }
    }
    close_list_section(w, any);
}

fn render_experience<'a>(
    w: &mut LatexWriter,
    entries: impl Iterator<Item = &'a ExperienceEntry>,
) {
    open_list_section(w, "%-----------EXPERIENCE-----------%", r"\section{Experience}");
    let mut any = false;
    for exp in entries {
        any = true;
        w.markup(2, r"\resumeSubheading");
        w.line(
            2,
            &[M("{"), T(&exp.organization), M("}{"), T(&exp.duration), M("}")],
        );
        w.line(2, &[M("{"), T(&exp.role), M("}{"), T(&exp.location), M("}")]);
        render_bullets(w, &exp.description);
    }
    close_list_section(w, any);
}

fn render_projects<'a>(w: &mut LatexWriter, entries: impl Iterator<Item = &'a ProjectEntry>) {
    open_list_section(w, "%-----------PROJECTS-----------%", r"\section{Projects}");
    let mut any = false;
    for proj in entries {
        any = true;
        w.markup(2, r"\resumeProjectHeading");
        if proj.technologies.is_empty() {
            w.line(2, &[M(r"{\textbf{"), T(&proj.name), M("}}{}")]);
        } else {
            let technologies = proj.technologies.join(SKILL_SEPARATOR);
            w.line(
                2,
                &[
                    M(r"{\textbf{"),
                    T(&proj.name),
                    M(r"} $|$ \emph{"),
                    T(&technologies),
                    M("}}{}"),
                ],
            );
        }
        render_bullets(w, &proj.description);
    }
    close_list_section(w, any);
}

fn render_skills(w: &mut LatexWriter, resume: &ResumeRecord) {
    w.markup(0, "%-----------SKILLS-----------%");
    w.markup(0, r"\section{Skills}");
    w.markup(1, r"\begin{itemize}[leftmargin=0.15in, label={}]");
    w.markup(2, r"\small{\item{");

    let categories: Vec<_> = resume.skills().iter().collect();
    let last = categories.len().saturating_sub(1);
    for (i, category) in categories.into_iter().enumerate() {
        let skills = category.skills.join(SKILL_SEPARATOR);
        let mut line = vec![
            M(r"\textbf{"),
            T(&category.category),
            M("}{: "),
            T(&skills),
            M("}"),
        ];
        if i < last {
            line.push(M(r" \\"));
        }
        w.line(3, &line);
    }

    w.markup(2, "}}");
    w.markup(1, r"\end{itemize}");
    w.blank();
}

// ────────────────────────────────────────────────────────────────────────────
// Shared pieces
// ────────────────────────────────────────────────────────────────────────────

fn open_list_section(w: &mut LatexWriter, banner: &'static str, heading: &'static str) {
    w.markup(0, banner);
    w.markup(0, heading);
    w.markup(1, r"\resumeSubHeadingListStart");
}

/// An `itemize` needs at least one item; empty sections get a blank placeholder.
fn close_list_section(w: &mut LatexWriter, had_entries: bool) {
    if !had_entries {
        w.markup(2, r"\resumeNoEntries");
    }
    w.markup(1, r"\resumeSubHeadingListEnd");
    w.blank();
}

/// Bullet list for one entry; omitted entirely when there are no bullets.
fn render_bullets(w: &mut LatexWriter, bullets: &[String]) {
    if bullets.is_empty() {
        return;
    }
    w.markup(3, r"\resumeItemListStart");
    for bullet in bullets {
        w.line(4, &[M(r"\resumeItem{"), T(bullet), M("}")]);
    }
    w.markup(3, r"\resumeItemListEnd");
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tailoring::latex::tests::unescape_latex;
    use crate::tailoring::models::{Identity, SkillInventory};

    fn identity() -> Identity {
        Identity {
            name: "Grace Hopper".to_string(),
            phone: "+1 555 0100".to_string(),
            email: "grace@example.com".to_string(),
            linkedin: "gracehopper".to_string(),
            github: "ghopper".to_string(),
        }
    }

    fn education() -> EducationEntry {
        EducationEntry {
            institution: "Yale University".to_string(),
            degree: "PhD Mathematics".to_string(),
            grade: "4.00 / 4.00".to_string(),
            duration: "1934".to_string(),
        }
    }

    fn full_record() -> ResumeRecord {
        ResumeRecord::new(
            identity(),
            vec![education()],
            vec![ExperienceEntry {
                organization: "Eckert-Mauchly Corp".to_string(),
                role: "Senior Mathematician".to_string(),
                location: "Philadelphia, PA".to_string(),
                duration: "1949 - 1952".to_string(),
                description: vec![
                    "Built the A-0 compiler".to_string(),
                    "Cut programming time by 50%".to_string(),
                ],
                skills: ["compilers".to_string()].into_iter().collect(),
            }],
            vec![ProjectEntry {
                name: "FLOW-MATIC".to_string(),
                technologies: vec!["UNIVAC I".to_string(), "Assembly".to_string()],
                description: vec!["English-like data processing language".to_string()],
                skills: Default::default(),
            }],
            SkillInventory::from_pairs([
                ("Languages", vec!["COBOL", "FLOW-MATIC"]),
                ("Hardware", vec!["UNIVAC I", "Harvard Mark I"]),
            ]),
        )
        .unwrap()
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_sections_render_in_fixed_order() {
        let doc = render(&full_record());
        let positions: Vec<usize> = [
            "%----------HEADING",
            r"\section{Education}",
            r"\section{Experience}",
            r"\section{Projects}",
            r"\section{Skills}",
            r"\end{document}",
        ]
        .iter()
        .map(|marker| doc.find(marker).unwrap_or_else(|| panic!("missing {marker}")))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn test_render_is_deterministic() {
        let record = full_record();
        assert_eq!(render(&record), render(&record));
    }

    #[test]
    fn test_entry_fields_rendered() {
        let doc = render(&full_record());
        assert!(doc.contains("{Yale University}{1934}"));
        assert!(doc.contains("{PhD Mathematics}{GPA: 4.00 / 4.00}"));
        assert!(doc.contains("{Senior Mathematician}{Philadelphia, PA}"));
        assert!(doc.contains(r"\resumeItem{Cut programming time by 50\%}"));
        assert!(doc.contains(r"{\textbf{FLOW-MATIC} $|$ \emph{UNIVAC I, Assembly}}{}"));
    }

    #[test]
    fn test_heading_contact_links() {
        let doc = render(&full_record());
        assert!(doc.contains(r"\textbf{\Huge \scshape Grace Hopper}"));
        assert!(doc.contains(r"\href{mailto:grace@example.com}"));
        assert!(doc.contains(r"\href{https://www.linkedin.com/in/gracehopper}"));
        assert!(doc.contains(r"\underline{github.com/ghopper}}"));
    }

    #[test]
    fn test_link_targets_url_escaped_display_text_latex_escaped() {
        let record = ResumeRecord::new(
            Identity {
                name: "Ada".to_string(),
                email: "first_last@ex.com".to_string(),
                github: "ada_l#1".to_string(),
                ..Identity::default()
            },
            vec![],
            vec![],
            vec![],
            SkillInventory::default(),
        )
        .unwrap();
        let doc = render(&record);
        assert!(doc.contains(
            r"\href{mailto:first_last@ex.com}{\seticon{faEnvelope} \underline{first\_last@ex.com}}"
        ));
        assert!(doc.contains(
            r"\href{https://github.com/ada_l\#1}{\seticon{faGithub} \underline{github.com/ada\_l\#1}}"
        ));
    }

    #[test]
    fn test_empty_contacts_not_displayed() {
        let record = ResumeRecord::new(
            Identity {
                name: "Solo".to_string(),
                github: "solo".to_string(),
                ..Identity::default()
            },
            vec![],
            vec![],
            vec![],
            SkillInventory::default(),
        )
        .unwrap();
        let doc = render(&record);
        assert!(!doc.contains("faPhone"));
        assert!(!doc.contains("mailto:"));
        assert!(!doc.contains("linkedin.com"));
        assert!(doc.contains(r"\underline{github.com/solo}}"));
        assert!(!doc.contains(r"\underline{github.com/solo}} \quad"));
    }

    #[test]
    fn test_skills_in_insertion_order_joined_with_comma() {
        let doc = render(&full_record());
        let languages = doc.find(r"\textbf{Languages}{: COBOL, FLOW-MATIC} \\").unwrap();
        let hardware = doc.find(r"\textbf{Hardware}{: UNIVAC I, Harvard Mark I}").unwrap();
        assert!(languages < hardware);
    }

    #[test]
    fn test_empty_experience_and_projects_keep_balanced_wrappers() {
        let record = ResumeRecord::new(
            identity(),
            vec![education()],
            vec![],
            vec![],
            SkillInventory::from_pairs([("Languages", vec!["Rust"])]),
        )
        .unwrap();
        let doc = render(&record);

        assert!(doc.contains(r"\section{Experience}"));
        assert!(doc.contains(r"\section{Projects}"));
        assert!(doc.contains("{Yale University}{1934}"));
        assert!(doc.contains(r"\textbf{Languages}{: Rust}"));
        assert_eq!(count(&doc, "\\resumeSubHeadingListStart\n"), 3);
        assert_eq!(count(&doc, "\\resumeSubHeadingListEnd\n"), 3);
        assert_eq!(count(&doc, "        \\resumeNoEntries\n"), 2);
        assert_eq!(count(&doc, r"\begin{"), count(&doc, r"\end{"));
    }

    #[test]
    fn test_all_empty_record_is_minimal_valid_document() {
        let record = ResumeRecord::new(
            Identity::default(),
            vec![],
            vec![],
            vec![],
            SkillInventory::default(),
        )
        .unwrap();
        let doc = render(&record);
        assert!(doc.starts_with(r"\documentclass"));
        assert!(doc.trim_end().ends_with(r"\end{document}"));
        assert_eq!(count(&doc, "        \\resumeNoEntries\n"), 3);
        assert_eq!(count(&doc, r"\begin{"), count(&doc, r"\end{"));
    }

    #[test]
    fn test_entry_without_bullets_has_no_item_list() {
        let record = ResumeRecord::new(
            Identity::default(),
            vec![],
            vec![],
            vec![ProjectEntry {
                name: "Bare".to_string(),
                technologies: vec![],
                description: vec![],
                skills: Default::default(),
            }],
            SkillInventory::default(),
        )
        .unwrap();
        let doc = render(&record);
        assert!(doc.contains(r"{\textbf{Bare}}{}"));
        assert_eq!(count(&doc, "\\resumeItemListStart\n"), 0);
    }

    #[test]
    fn test_special_characters_escaped_and_recoverable() {
        let nasty = r"R&D_lead 100% {x} #1 $5 ~ ^ \end{document}";
        let record = ResumeRecord::new(
            Identity {
                name: nasty.to_string(),
                ..Identity::default()
            },
            vec![],
            vec![ExperienceEntry {
                organization: "Acme & Sons".to_string(),
                role: "Dev".to_string(),
                location: String::new(),
                duration: String::new(),
                description: vec![nasty.to_string()],
                skills: Default::default(),
            }],
            vec![],
            SkillInventory::from_pairs([("C#/.NET", vec!["C#", "F#"])]),
        )
        .unwrap();
        let doc = render(&record);

        assert_eq!(count(&doc, r"\end{document}"), 1, "field content must not close the document");
        assert!(doc.contains(r"{Acme \& Sons}"));
        assert!(doc.contains(r"\textbf{C\#/.NET}{: C\#, F\#}"));

        let prefix = r"\resumeItem{";
        let start = doc.find(prefix).unwrap() + prefix.len();
        let end = start + doc[start..].find("}\n").unwrap();
        assert_eq!(unescape_latex(&doc[start..end]), nasty);
    }
}
