// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Localized interface strings.

use crate::settings::Language;

/// Strings shown by the shell, one table per [`Language`].
#[derive(Debug)]
pub struct Strings {
    pub app_title: &'static str,
    pub new_chat: &'static str,
    pub recent_cases: &'static str,
    pub tools: &'static str,
    pub settings: &'static str,
    pub logout: &'static str,
    pub input_placeholder: &'static str,
    pub welcome_title: &'static str,
    pub welcome_subtitle: &'static str,
    pub welcome_suffix: &'static str,
    pub welcome_desc: &'static str,
    pub suggestions: [&'static str; 4],
    pub appearance: &'static str,
    pub language: &'static str,
    pub light: &'static str,
    pub dark: &'static str,
    pub system: &'static str,
    pub lang_desc: &'static str,
    pub clear_history: &'static str,
    pub export_data: &'static str,
    pub danger_zone: &'static str,
    pub regen_key: &'static str,
    pub two_factor: &'static str,
}

impl Strings {
    /// Welcome headline assembled from its three parts.
    pub fn welcome(&self) -> String {
        format!(
            "{} {} {}",
            self.welcome_title, self.welcome_subtitle, self.welcome_suffix
        )
    }
}

pub static EN: Strings = Strings {
    app_title: "Matrix Agent",
    new_chat: "New Investigation",
    recent_cases: "Recent Cases",
    tools: "Tools",
    settings: "Settings",
    logout: "Log out",
    input_placeholder: "Enter address (0x... / Base58) or ask a question...",
    welcome_title: "How can I assist with",
    welcome_subtitle: "on-chain",
    welcome_suffix: "forensics?",
    welcome_desc: "I can analyze transaction graphs, audit smart contracts for vulnerabilities, and trace funds across mixers.",
    suggestions: [
        "Analyze address 0x7a250d...",
        "Trace funds from the latest bridge hack",
        "Check risk score for USDT contract",
        "Explain the logic of this reentrancy attack",
    ],
    appearance: "Appearance",
    language: "Language",
    light: "Light",
    dark: "Dark",
    system: "System",
    lang_desc: "Language for the UI and AI responses",
    clear_history: "Clear All Chats",
    export_data: "Export Data",
    danger_zone: "Danger Zone",
    regen_key: "Regenerate API Key",
    two_factor: "Two-Factor Authentication",
};

pub static ZH: Strings = Strings {
    app_title: "Matrix 智能体",
    new_chat: "发起新调查",
    recent_cases: "近期案例",
    tools: "工具箱",
    settings: "设置",
    logout: "退出登录",
    input_placeholder: "输入地址 (0x... / Base58) 或提问...",
    welcome_title: "我该如何协助您的",
    welcome_subtitle: "链上",
    welcome_suffix: "取证工作？",
    welcome_desc: "我可以分析交易图谱，审计智能合约漏洞，并追踪混币器资金流向。",
    suggestions: [
        "分析地址 0x7a250d...",
        "追踪最新跨链桥黑客资金",
        "检查 USDT 合约风险评分",
        "解释这个重入攻击的逻辑",
    ],
    appearance: "外观主题",
    language: "语言设置",
    light: "浅色",
    dark: "深色",
    system: "跟随系统",
    lang_desc: "界面和 AI 回复的语言",
    clear_history: "清除所有对话",
    export_data: "导出数据",
    danger_zone: "危险区域",
    regen_key: "重置 API 密钥",
    two_factor: "双重验证",
};

pub static JA: Strings = Strings {
    app_title: "Matrix エージェント",
    new_chat: "新規調査",
    recent_cases: "最近のケース",
    tools: "ツール",
    settings: "設定",
    logout: "ログアウト",
    input_placeholder: "アドレス (0x... / Base58) を入力するか質問してください...",
    welcome_title: "どのような",
    welcome_subtitle: "オンチェーン",
    welcome_suffix: "分析をお手伝いしますか？",
    welcome_desc: "トランザクショングラフの分析、スマートコントラクトの監査、ミキサー間の資金追跡が可能です。",
    suggestions: [
        "アドレス 0x7a250d... を分析",
        "最新のブリッジハック資金を追跡",
        "USDTコントラクトのリスクスコアを確認",
        "再入攻撃のロジックを説明して",
    ],
    appearance: "外観",
    language: "言語",
    light: "ライト",
    dark: "ダーク",
    system: "システム",
    lang_desc: "UIおよびAI応答の言語",
    clear_history: "履歴を消去",
    export_data: "データのエクスポート",
    danger_zone: "危険エリア",
    regen_key: "APIキーを再生成",
    two_factor: "二要素認証",
};

pub fn strings(language: Language) -> &'static Strings {
    match language {
        Language::En => &EN,
        Language::Zh => &ZH,
        Language::Ja => &JA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_language_has_a_table() {
        for lang in Language::iter() {
            let s = strings(lang);
            assert!(s.app_title.starts_with("Matrix"));
            assert!(s.suggestions.iter().all(|x| !x.is_empty()));
        }
    }

    #[test]
    fn tables_differ() {
        assert_eq!(strings(Language::En).new_chat, "New Investigation");
        assert_eq!(strings(Language::Zh).new_chat, "发起新调查");
        assert_eq!(strings(Language::Ja).new_chat, "新規調査");
        assert_eq!(
            strings(Language::En).welcome(),
            "How can I assist with on-chain forensics?"
        );
    }
}
