//! Static, language-selected user-facing messages.
//!
//! Handlers and the generator degrade to these instead of raising errors.
//! Supported languages: Azerbaijani ("az"), Russian ("ru"), English ("en");
//! anything else falls back to English.

/// Normalize a language code to one of the supported table keys.
fn lang_key(language: &str) -> &'static str {
    let code = language.trim().to_lowercase();
    match code.get(..2) {
        Some("az") => "az",
        Some("ru") => "ru",
        _ => "en",
    }
}

/// Greeting/help message for TALK queries.
pub fn greeting(language: &str) -> &'static str {
    match lang_key(language) {
        "az" => {
            "Salam! Mən xəbər köməkçisiyəm. Xəbərlərlə bağlı suallarınızı verə bilərsiniz — \
             məsələn, hadisələr, statistika və ya müəyyən mövzular haqqında."
        }
        "ru" => {
            "Здравствуйте! Я новостной ассистент. Задавайте вопросы о новостях — \
             о событиях, статистике или конкретных темах."
        }
        _ => {
            "Hello! I am a news assistant. Ask me about the news — \
             events, statistics, or specific topics."
        }
    }
}

/// Security warning for rejected (attacking) queries.
pub fn security_warning(language: &str) -> &'static str {
    match lang_key(language) {
        "az" => {
            "Bu sorğu təhlükəsizlik qaydalarına zidd olduğu üçün emal edilmədi. \
             Xəbərlərlə bağlı sual verə bilərsiniz."
        }
        "ru" => {
            "Этот запрос не был обработан, так как нарушает правила безопасности. \
             Вы можете задать вопрос о новостях."
        }
        _ => {
            "This request was not processed because it violates security policy. \
             You can ask a question about the news."
        }
    }
}

/// Redirect for PREDICTION queries; forecasting is not implemented.
pub fn prediction_redirect(language: &str) -> &'static str {
    match lang_key(language) {
        "az" => {
            "Gələcək hadisələr üzrə proqnoz vermirəm. Bunun əvəzinə keçmiş dövrlər üzrə \
             statistik suallar verə bilərsiniz — məsələn, \"ötən ay ən çox hansı mövzular \
             işıqlandırılıb?\"."
        }
        "ru" => {
            "Я не делаю прогнозов о будущих событиях. Вместо этого вы можете задать \
             статистический вопрос о прошлых периодах — например, \"какие темы чаще всего \
             освещались в прошлом месяце?\"."
        }
        _ => {
            "I do not forecast future events. Instead, you can ask statistics questions \
             about past periods — for example, \"which topics were covered most last month?\"."
        }
    }
}

/// Empty result set from a statistics query.
pub fn no_results(language: &str) -> &'static str {
    match lang_key(language) {
        "az" => "Bu sorğu üzrə heç bir nəticə tapılmadı.",
        "ru" => "По этому запросу ничего не найдено.",
        _ => "No results were found for this query.",
    }
}

/// Retrieval backend failure.
pub fn search_error(language: &str) -> &'static str {
    match lang_key(language) {
        "az" => "Axtarış zamanı xəta baş verdi. Bir az sonra yenidən cəhd edin.",
        "ru" => "Произошла ошибка при поиске. Повторите попытку позже.",
        _ => "An error occurred during search. Please try again later.",
    }
}

/// Statistics backend failure.
pub fn statistics_error(language: &str) -> &'static str {
    match lang_key(language) {
        "az" => "Statistik sorğu icra edilə bilmədi. Bir az sonra yenidən cəhd edin.",
        "ru" => "Не удалось выполнить статистический запрос. Повторите попытку позже.",
        _ => "The statistics query could not be executed. Please try again later.",
    }
}

/// No-evidence answer from the generator.
pub fn no_information(language: &str) -> &'static str {
    match lang_key(language) {
        "az" => "Bu sual üzrə məlumat tapılmadı.",
        "ru" => "Информация по этому вопросу не найдена.",
        _ => "No information was found for this question.",
    }
}

/// Answer-generation failure.
pub fn generation_error(language: &str) -> &'static str {
    match lang_key(language) {
        "az" => "Cavab hazırlanarkən xəta baş verdi. Bir az sonra yenidən cəhd edin.",
        "ru" => "Произошла ошибка при подготовке ответа. Повторите попытку позже.",
        _ => "An error occurred while preparing the answer. Please try again later.",
    }
}
