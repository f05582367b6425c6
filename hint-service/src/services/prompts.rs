//! Prompt text for the model and cleanup of what comes back.

/// Artwork the student is observing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtworkMeta {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub year: Option<String>,
}

/// Instruction asking for 3-6 observation hints on the attached image.
pub fn build_hint_prompt(free_text: &str, meta: &ArtworkMeta) -> String {
    let title = meta.title.as_deref().unwrap_or("");
    let artist = meta.artist.as_deref().unwrap_or("");
    let year = meta
        .year
        .as_deref()
        .map(|y| format!(", {}", y))
        .unwrap_or_default();

    format!(
        "선택 작품: {title} ({artist}{year})\n\
         아래 학생의 자유 관찰 초안을 바탕으로, 더 구체적이고 명확한 관찰을 할 수 있도록 3~6개의 맞춤 힌트를 제시하세요.\n\
         - 색채/형태·질감/구도·소재·분위기 중 보완이 필요한 부분 위주\n\
         - 비교/대조/근거 제시 유도\n\
         - 짧고 실행 가능한 문장으로\n\
         \n\
         [학생 자유 관찰 초안]\n\
         {free_text}\n",
        free_text = free_text.trim(),
    )
}

/// Instruction condensing a refined observation into one sentence.
pub fn build_refine_instruction(refined_text: &str) -> String {
    [
        "아래 '수정 관찰(요약)' 텍스트만 사용하여, 새로운 내용을 추가하지 말고 자연스러운 한국어 한 문장으로 정리하세요.",
        "- 핵심 명사/형용사/관계어를 보존하고, 의미가 겹치는 표현은 병합",
        "- 불필요한 조사/어미/군더더기 제거",
        "- 제목/작품명/원작/느낀/반영 등의 단어 사용 금지",
        "- 결과는 한 문장(마침표 하나)만 출력. 접두/해설/따옴표/코드블록 금지",
        &format!("\n[수정 관찰(요약)]\n{}", refined_text.trim()),
    ]
    .join("\n")
}

/// Strip the label, fences and quotes the model tends to wrap a one-line
/// prompt in, and fold line breaks into `, `.
pub fn clean_generated_prompt(raw: &str) -> String {
    let text = strip_prompt_label(raw.trim());
    let text = text.trim_matches('`');
    let text = text.trim_matches('"');

    let mut out = String::with_capacity(text.len());
    let mut in_break = false;
    for ch in text.chars() {
        if ch == '\n' || ch == '\r' {
            if !in_break {
                out.push_str(", ");
                in_break = true;
            }
        } else {
            out.push(ch);
            in_break = false;
        }
    }

    out.trim().to_string()
}

/// `프롬프트:` / `프롬프트 -` / `프롬프트：` at the start of the text.
fn strip_prompt_label(text: &str) -> &str {
    let Some(rest) = text.trim_start().strip_prefix("프롬프트") else {
        return text;
    };
    let rest = rest.trim_start();
    match rest.chars().next() {
        Some(sep @ (':' | '：' | '-')) => rest[sep.len_utf8()..].trim_start(),
        _ => text,
    }
}
