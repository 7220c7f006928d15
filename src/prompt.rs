//! Naming styles and prompt rendering.
//!
//! This module renders the fixed instruction template sent to the model,
//! parameterized by the phrase to convert and the selected naming style.

use std::fmt;
use std::str::FromStr;

use crate::types::ChatMessage;

/// System prompt establishing the naming-assistant persona.
pub const SYSTEM_PROMPT: &str = "你是一位资深的软件工程师和编程规范专家，精通多种编程语言的命名约定。你的任务是将中文概念准确转换为地道的英文变量名，确保：1) 语义准确表达原始概念；2) 遵循目标命名风格；3) 符合国际编程最佳实践；4) 使用简洁明了的英语词汇；5）请不要回复无关的信息，仅回复变量名，不要回复任何其他信息。";

/// Output token formatting for generated names.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NamingStyle {
    /// camelCase (default).
    #[default]
    Camel,

    /// PascalCase.
    Pascal,

    /// snake_case.
    Snake,

    /// kebab-case.
    Kebab,
}

impl NamingStyle {
    /// The CLI keyword for this style.
    pub fn keyword(&self) -> &'static str {
        match self {
            NamingStyle::Camel => "camel",
            NamingStyle::Pascal => "pascal",
            NamingStyle::Snake => "snake",
            NamingStyle::Kebab => "kebab",
        }
    }

    /// Human-readable description of this style.
    pub fn description(&self) -> &'static str {
        match self {
            NamingStyle::Camel => "驼峰命名法 (camelCase)",
            NamingStyle::Pascal => "帕斯卡命名法 (PascalCase)",
            NamingStyle::Snake => "蛇形命名法 (snake_case)",
            NamingStyle::Kebab => "短横线命名法 (kebab-case)",
        }
    }

    /// Example names shown to the model for this style.
    pub fn examples(&self) -> &'static str {
        match self {
            NamingStyle::Camel => "userName, userProfile, dataCount, isActive",
            NamingStyle::Pascal => "UserName, UserProfile, DataCount, IsActive",
            NamingStyle::Snake => "user_name, user_profile, data_count, is_active",
            NamingStyle::Kebab => "user-name, user-profile, data-count, is-active",
        }
    }
}

impl fmt::Display for NamingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

impl FromStr for NamingStyle {
    type Err = std::convert::Infallible;

    /// Parse a style keyword. Unknown keywords fall back to camelCase
    /// rather than erroring.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "camel" => NamingStyle::Camel,
            "pascal" => NamingStyle::Pascal,
            "snake" => NamingStyle::Snake,
            "kebab" => NamingStyle::Kebab,
            _ => NamingStyle::Camel,
        })
    }
}

/// Render the instruction prompt for the given phrase and style.
pub fn build_prompt(text: &str, style: NamingStyle) -> String {
    format!(
        r#"作为专业的变量命名助手，为中文词汇"{text}"生成高质量的英文变量名。

## 要求
- 命名风格: {style_desc}
- 参考示例: {examples}
- 生成3-5个选项
- 使用地道英语，避免中式英语
- 符合编程最佳实践

## 输出格式
每行一个变量名，格式: 变量名 - 说明
示例:
userName - 用户名称
accountName - 账户名称
userAccount - 用户账户

## 命名原则
1. 语义准确: 准确表达概念含义
2. 简洁明了: 避免冗长或复杂的词汇
3. 约定俗成: 使用业界通用术语
4. 上下文适配: 考虑在代码中的使用场景

现在开始生成变量名:"#,
        style_desc = style.description(),
        examples = style.examples(),
    )
}

/// Build the message list for one conversion request.
pub fn conversion_messages(text: &str, style: NamingStyle) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_prompt(text, style)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageRole;

    #[test]
    fn parse_known_styles() {
        assert_eq!("camel".parse::<NamingStyle>().unwrap(), NamingStyle::Camel);
        assert_eq!(
            "pascal".parse::<NamingStyle>().unwrap(),
            NamingStyle::Pascal
        );
        assert_eq!("snake".parse::<NamingStyle>().unwrap(), NamingStyle::Snake);
        assert_eq!("kebab".parse::<NamingStyle>().unwrap(), NamingStyle::Kebab);
    }

    #[test]
    fn unknown_style_falls_back_to_camel() {
        let style = "hungarian".parse::<NamingStyle>().unwrap();
        assert_eq!(style, NamingStyle::Camel);
        assert_eq!(style.description(), "驼峰命名法 (camelCase)");
    }

    #[test]
    fn prompt_embeds_text_and_style() {
        let prompt = build_prompt("数据库连接", NamingStyle::Snake);
        assert!(prompt.contains("数据库连接"));
        assert!(prompt.contains("蛇形命名法 (snake_case)"));
        assert!(prompt.contains("user_name, user_profile, data_count, is_active"));
    }

    #[test]
    fn conversion_messages_shape() {
        let messages = conversion_messages("用户名称", NamingStyle::Camel);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[0].content, SYSTEM_PROMPT);
        assert_eq!(messages[1].role, MessageRole::User);
        assert!(messages[1].content.contains("用户名称"));
    }
}
