//! Prompt rendering for quiz analysis and chat.
//!
//! Both builders are pure: same input, same text, no I/O. Prompts are in
//! Indonesian because the audience is Indonesian IT students.

use std::fmt::Write;

use careerpath_core::career::{CAREER_PATHS, QuizAnswerSet};
use careerpath_core::message::{ConversationTurn, recent_turns};

const ANALYSIS_ROLE: &str = "Kamu adalah career advisor untuk mahasiswa IT yang masih bingung \
memilih jalur karir.";

const RESPONSE_SCHEMA: &str = r#"{
  "careerPath": "nama jalur karir yang paling cocok",
  "confidence": 85,
  "reasons": ["alasan 1", "alasan 2", "alasan 3"],
  "learningPath": ["langkah belajar 1", "langkah 2", "langkah 3"],
  "skills": ["skill 1", "skill 2", "skill 3"],
  "resources": ["resource 1", "resource 2", "resource 3"]
}"#;

const CHAT_PERSONA: &str = "Kamu adalah career advisor untuk mahasiswa IT di Indonesia. \
Gaya bicaramu santai dan to-the-point.

ATURAN PENTING:
- Jawab SINGKAT dan PADAT, maksimal 2-3 kalimat atau 1 paragraf pendek
- Langsung ke inti, tanpa basa-basi
- Pakai bullet points kalau jawabannya lebih jelas begitu
- Hindari pembuka atau penutup yang panjang
- Fokus pada informasi praktis yang bisa langsung dipakai";

const CHAT_CLOSING: &str =
    "Jawab SINGKAT (maksimal 2-3 kalimat atau 1 paragraf pendek). Langsung ke intinya!";

fn write_career_paths(out: &mut String) {
    for path in CAREER_PATHS {
        let _ = writeln!(out, "- {path}");
    }
}

/// Render the quiz-analysis prompt.
///
/// Answers are numbered from 1 in question order, followed by the allowed
/// career paths and the exact JSON shape the model must return.
pub fn quiz_analysis_prompt(answers: &QuizAnswerSet) -> String {
    let mut out = String::with_capacity(1024);

    let _ = writeln!(out, "{ANALYSIS_ROLE}");
    let _ = writeln!(out, "Berdasarkan jawaban quiz berikut:\n");
    for (number, answer) in answers.numbered() {
        let _ = writeln!(out, "{number}. {answer}");
    }

    let _ = writeln!(out, "\nJalur karir IT yang tersedia:");
    write_career_paths(&mut out);

    let _ = writeln!(
        out,
        "\nAnalisis jawaban tersebut dan berikan rekomendasi dalam format JSON:"
    );
    let _ = writeln!(out, "{RESPONSE_SCHEMA}\n");
    let _ = writeln!(
        out,
        "Pilih jalur karir yang paling sesuai dengan pola jawaban."
    );
    out.push_str("Jawab HANYA dengan satu objek JSON, tanpa penjelasan tambahan.\n");

    out
}

/// Render the chat prompt from prior turns and the new message.
///
/// Only the last `window` turns are included, oldest first. With no history
/// the transcript section is present but empty.
pub fn chat_prompt(history: &[ConversationTurn], message: &str, window: usize) -> String {
    let mut out = String::with_capacity(1024);

    out.push_str(CHAT_PERSONA);
    out.push_str("\n\nJalur karir IT yang bisa kamu rekomendasikan:\n");
    write_career_paths(&mut out);
    out.push_str("\nGunakan bahasa Indonesia yang santai, seperti ngobrol dengan teman.\n\n");

    out.push_str("Riwayat percakapan:\n");
    for turn in recent_turns(history, window) {
        let _ = writeln!(out, "{}: {}", turn.role.label(), turn.content);
    }

    let _ = write!(out, "\nUser: {message}\n\n{CHAT_CLOSING}");

    out
}
