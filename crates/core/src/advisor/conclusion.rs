use crate::domain::comparison::Recommendation;
use crate::domain::profile::UsageLevel;

const WORTH_IT_INTENSE: &str = "Para o seu perfil de uso intenso, trocar faz sentido. Os ganhos \
                                de desempenho serão perceptíveis no dia a dia.";
const WORTH_IT_INTERMEDIATE: &str = "Para o seu perfil, trocar faz sentido, mas não vale pagar \
                                     caro por recursos que você não vai usar. Priorize \
                                     equilíbrio e bateria.";
const WORTH_IT_BASIC: &str = "A troca vale a pena, mas lembre-se: você não precisa do modelo \
                              mais caro para suas necessidades.";
const DEPENDS: &str = "A troca pode valer a pena dependendo do preço. Aguarde promoções para \
                       uma decisão mais vantajosa.";
const NOT_WORTH: &str = "Com base no seu uso, não faz sentido trocar agora. Seu aparelho atual \
                         ainda atende bem suas necessidades.";

/// Fixed consumer copy per verdict. Only a `worth_it` verdict varies by the
/// user's usage level; the enums make every arm explicit, so there is no
/// silent fallback path.
pub(crate) fn conclusion_for(recommendation: Recommendation, usage_level: UsageLevel) -> &'static str {
    match recommendation {
        Recommendation::NotWorth => NOT_WORTH,
        Recommendation::Depends => DEPENDS,
        Recommendation::WorthIt => match usage_level {
            UsageLevel::Intense => WORTH_IT_INTENSE,
            UsageLevel::Intermediate => WORTH_IT_INTERMEDIATE,
            UsageLevel::Basic => WORTH_IT_BASIC,
        },
    }
}
